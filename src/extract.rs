//! Snippet extraction: turns one annotated source file into clean challenge
//! entries with line-accurate ground truth.
//!
//! The passes run in a fixed order per key:
//!   1. locate the key's start..end region on physical lines (any line ending)
//!   2. drop structural lines (markers, hide-line, hide-start..hide-end)
//!   3. trim leading/trailing blank lines and rejoin the region text
//!   4. split that text with the CRLF/LF/CR fallback
//!   5. tag vuln/neutral lines by their position in what is left
//!   6. strip per-line tag text and join
//!
//! Numbering (5) must see the output of (2)-(4) and must run before (6).

use crate::domain::{ChallengeEntry, FileMatch};
use crate::error::{Result, SnippetError};
use crate::markers::{parse_line, strip_line_tag, DirectiveKind};
use crate::util::is_blank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEnding {
  CrLf,
  Lf,
  Cr,
}

impl LineEnding {
  pub fn as_str(self) -> &'static str {
    match self {
      LineEnding::CrLf => "\r\n",
      LineEnding::Lf => "\n",
      LineEnding::Cr => "\r",
    }
  }

  /// First convention that yields more than one line; `Cr` when none does.
  ///
  /// Mixed line endings are not reconciled: a CRLF file with stray LF-only
  /// lines keeps those as embedded newlines inside a single "line".
  pub fn detect(text: &str) -> Self {
    [LineEnding::CrLf, LineEnding::Lf, LineEnding::Cr]
      .into_iter()
      .find(|le| text.split(le.as_str()).nth(1).is_some())
      .unwrap_or(LineEnding::Cr)
  }
}

pub fn split_lines(text: &str) -> (Vec<&str>, LineEnding) {
  let ending = LineEnding::detect(text);
  (text.split(ending.as_str()).collect(), ending)
}

/// One physical line of the file with the terminator it carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Line<'a> {
  text: &'a str,
  ending: &'a str,
}

/// Split on any of `\r\n`, `\n` or `\r`, keeping each line's own terminator.
/// Region location runs on these, so a file's endings may be mixed freely.
fn physical_lines(text: &str) -> Vec<Line<'_>> {
  let bytes = text.as_bytes();
  let mut out = Vec::new();
  let mut start = 0;
  let mut i = 0;
  while i < bytes.len() {
    let end = match bytes[i] {
      b'\n' => i + 1,
      b'\r' if bytes.get(i + 1) == Some(&b'\n') => i + 2,
      b'\r' => i + 1,
      _ => {
        i += 1;
        continue;
      }
    };
    out.push(Line { text: &text[start..i], ending: &text[i..end] });
    start = end;
    i = end;
  }
  out.push(Line { text: &text[start..], ending: "" });
  out
}

/// Every key named by a start marker, deduplicated in first-seen order.
fn declared_keys(lines: &[Line<'_>]) -> Vec<String> {
  let mut keys: Vec<String> = Vec::new();
  for line in lines {
    let Some(d) = parse_line(line.text) else { continue };
    if d.kind != DirectiveKind::Start {
      continue;
    }
    for k in d.keys {
      if !keys.iter().any(|seen| seen == k) {
        keys.push(k.to_string());
      }
    }
  }
  keys
}

/// Lines strictly between the key's first start marker and the next end marker naming it.
fn locate_region<'a, 'l>(lines: &'l [Line<'a>], key: &str) -> Option<&'l [Line<'a>]> {
  let start = lines.iter().position(|l| names_key(l.text, DirectiveKind::Start, key))?;
  let len = lines[start + 1..]
    .iter()
    .position(|l| names_key(l.text, DirectiveKind::End, key))?;
  Some(&lines[start + 1..start + 1 + len])
}

fn names_key(line: &str, kind: DirectiveKind, key: &str) -> bool {
  parse_line(line).is_some_and(|d| d.kind == kind && d.names(key))
}

fn kind_of(line: &Line<'_>) -> Option<DirectiveKind> {
  parse_line(line.text).map(|d| d.kind)
}

/// Drop marker lines of any key, hide-line lines and hide-start..hide-end blocks.
fn strip_structural<'a>(region: &[Line<'a>]) -> Vec<Line<'a>> {
  let mut kept = Vec::with_capacity(region.len());
  let mut i = 0;
  while i < region.len() {
    match kind_of(&region[i]) {
      Some(DirectiveKind::HideStart) => {
        let close = region[i + 1..]
          .iter()
          .position(|l| kind_of(l) == Some(DirectiveKind::HideEnd));
        // An unclosed hide-start only hides itself.
        i += close.map_or(1, |offset| offset + 2);
        continue;
      }
      Some(kind) if kind.is_structural() => {}
      _ => kept.push(region[i]),
    }
    i += 1;
  }
  kept
}

/// Rejoin the surviving lines with their own terminators, minus blank edges.
fn region_text(lines: &[Line<'_>]) -> String {
  let Some(first) = lines.iter().position(|l| !is_blank(l.text)) else {
    return String::new();
  };
  let last = lines.iter().rposition(|l| !is_blank(l.text)).unwrap_or(first);
  let mut out = String::new();
  for (idx, line) in lines[first..=last].iter().enumerate() {
    if idx > 0 {
      out.push_str(lines[first + idx - 1].ending);
    }
    out.push_str(line.text);
  }
  out
}

fn tag_lines(lines: &[&str], key: &str) -> (Vec<u32>, Vec<u32>) {
  let mut vuln = Vec::new();
  let mut neutral = Vec::new();
  for (idx, line) in lines.iter().enumerate() {
    let Some(d) = parse_line(line) else { continue };
    if !d.names(key) {
      continue;
    }
    let line_no = (idx + 1) as u32;
    match d.kind {
      DirectiveKind::VulnLine => vuln.push(line_no),
      DirectiveKind::NeutralLine => neutral.push(line_no),
      _ => {}
    }
  }
  (vuln, neutral)
}

fn render(lines: &[&str], ending: LineEnding) -> String {
  lines
    .iter()
    .map(|l| strip_line_tag(l))
    .collect::<Vec<_>>()
    .join(ending.as_str())
}

fn extract_from_lines(lines: &[Line<'_>], key: &str) -> Result<ChallengeEntry> {
  let region = locate_region(lines, key).ok_or_else(|| SnippetError::BrokenBoundary(key.to_string()))?;
  let text = region_text(&strip_structural(region));
  let (visible, ending) = split_lines(&text);
  let (vuln_lines, neutral_lines) = tag_lines(&visible, key);
  Ok(ChallengeEntry {
    challenge_key: key.to_string(),
    snippet: render(&visible, ending),
    vuln_lines,
    neutral_lines,
  })
}

/// Extract every key declared in the file. One broken key never affects the others.
pub fn extract_file(file: &FileMatch) -> Vec<(String, Result<ChallengeEntry>)> {
  let lines = physical_lines(&file.content);
  declared_keys(&lines)
    .into_iter()
    .map(|key| {
      let res = extract_from_lines(&lines, &key);
      (key, res)
    })
    .collect()
}
