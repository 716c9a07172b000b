//! Progressive hints for rejected submissions.
//!
//! Authored hints come from `<codefixes_dir>/<key>.info.yml`. Attempt `n`
//! (1-indexed) gets the n-th authored hint; once they run out the vulnerable
//! line numbers are disclosed directly. Lookup is read-only; attempt counting
//! belongs to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::config::HintTemplates;
use crate::domain::ChallengeInfo;
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone, Debug)]
pub struct HintGenerator {
  codefixes_dir: PathBuf,
  templates: HintTemplates,
}

impl HintGenerator {
  pub fn new(codefixes_dir: impl Into<PathBuf>, templates: HintTemplates) -> Self {
    Self { codefixes_dir: codefixes_dir.into(), templates }
  }

  #[instrument(level = "debug", skip(self, vuln_lines))]
  pub fn hint(&self, key: &str, vuln_lines: &[u32], attempts: u32) -> Option<String> {
    let info = load_info(&self.codefixes_dir, key)?;
    hint_for(&info, vuln_lines, attempts, &self.templates)
  }
}

/// Read `<key>.info.yml`. Missing or unparsable files yield `None`.
pub fn load_info(dir: &Path, key: &str) -> Option<ChallengeInfo> {
  if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
    warn!(target: "challenge", %key, "Refusing to resolve info file for suspicious key");
    return None;
  }
  let path = dir.join(format!("{}.info.yml", key));
  let raw = match std::fs::read_to_string(&path) {
    Ok(raw) => raw,
    Err(e) => {
      debug!(target: "challenge", path = %path.display(), error = %e, "No challenge info file");
      return None;
    }
  };
  match serde_yaml::from_str::<ChallengeInfo>(&raw) {
    Ok(info) => Some(info),
    Err(e) => {
      warn!(target: "challenge", path = %path.display(), error = %trunc_for_log(&e.to_string(), 200), "Unparsable challenge info file");
      None
    }
  }
}

pub fn hint_for(info: &ChallengeInfo, vuln_lines: &[u32], attempts: u32, templates: &HintTemplates) -> Option<String> {
  let hints = info.hints.as_ref()?;
  if attempts as usize > hints.len() {
    return disclosure(vuln_lines, templates);
  }
  let idx = (attempts as usize).checked_sub(1)?;
  hints.get(idx).cloned()
}

fn disclosure(vuln_lines: &[u32], templates: &HintTemplates) -> Option<String> {
  match vuln_lines {
    [] => None,
    [line] => {
      let line = line.to_string();
      Some(fill_template(&templates.single_line, &[("vulnLine", line.as_str())]))
    }
    lines => {
      let joined = lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(",");
      Some(fill_template(&templates.multiple_lines, &[("vulnLines", joined.as_str())]))
    }
  }
}
