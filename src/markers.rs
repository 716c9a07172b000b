//! Marker grammar for annotated challenge regions.
//!
//! A directive is the token `vuln-code-snippet`, one space, a directive word
//! and (for region and tag directives) whitespace-separated challenge keys:
//!
//! ```text
//! // vuln-code-snippet start loginAdminChallenge loginBenderChallenge
//! const q = `SELECT * FROM Users WHERE email = '${email}'` // vuln-code-snippet vuln-line loginAdminChallenge
//! // vuln-code-snippet hide-start
//! ...helper code nobody needs to read...
//! // vuln-code-snippet hide-end
//! // vuln-code-snippet end loginAdminChallenge loginBenderChallenge
//! ```
//!
//! The comment prefix does not matter for recognition; `#` works as well as `//`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Substrings that make a file worth handing to the extractor.
pub const START_FILTERS: [&str; 2] = ["// vuln-code-snippet start", "# vuln-code-snippet start"];

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"vuln-code-snippet (start|end|hide-line|hide-start|hide-end|vuln-line|neutral-line)(?:[ \t]+([^\r\n]*))?(?:[\r\n]|$)",
  )
  .expect("directive regex")
});

static LINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s?[/#*]{0,2} ?vuln-code-snippet (?:vuln|neutral)-line[^\r\n]*").expect("line tag regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
  Start,
  End,
  HideLine,
  HideStart,
  HideEnd,
  VulnLine,
  NeutralLine,
}

impl DirectiveKind {
  fn from_word(word: &str) -> Option<Self> {
    Some(match word {
      "start" => DirectiveKind::Start,
      "end" => DirectiveKind::End,
      "hide-line" => DirectiveKind::HideLine,
      "hide-start" => DirectiveKind::HideStart,
      "hide-end" => DirectiveKind::HideEnd,
      "vuln-line" => DirectiveKind::VulnLine,
      "neutral-line" => DirectiveKind::NeutralLine,
      _ => return None,
    })
  }

  /// Directives whose whole line never reaches the rendered snippet.
  pub fn is_structural(self) -> bool {
    !matches!(self, DirectiveKind::VulnLine | DirectiveKind::NeutralLine)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive<'a> {
  pub kind: DirectiveKind,
  pub keys: Vec<&'a str>,
}

impl Directive<'_> {
  /// Exact, token-wise key match.
  pub fn names(&self, key: &str) -> bool {
    self.keys.iter().any(|k| *k == key)
  }
}

/// Parse the directive carried by one physical line, if any.
pub fn parse_line(line: &str) -> Option<Directive<'_>> {
  let caps = DIRECTIVE_RE.captures(line)?;
  let kind = DirectiveKind::from_word(caps.get(1)?.as_str())?;
  let keys = caps
    .get(2)
    .map(|m| m.as_str().split_whitespace().collect())
    .unwrap_or_default();
  Some(Directive { kind, keys })
}

/// True if the file text contains at least one start marker in comment form.
pub fn has_start_marker(content: &str) -> bool {
  START_FILTERS.iter().any(|needle| content.contains(needle))
}

/// Remove a trailing `vuln-line`/`neutral-line` annotation, keeping the code.
pub fn strip_line_tag(line: &str) -> Cow<'_, str> {
  LINE_TAG_RE.replace_all(line, "")
}
