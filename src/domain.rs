//! Domain models: annotated source files, extracted challenge entries and
//! the per-challenge info resource that carries authored hints.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One source file that contains at least one challenge start marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMatch {
  pub path: PathBuf,
  pub content: String,
}

/// A clean, display-ready snippet plus its ground truth.
///
/// Line numbers are 1-indexed positions into `snippet` after every
/// annotation has been stripped. `vuln_lines` and `neutral_lines` are disjoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeEntry {
  pub challenge_key: String,
  pub snippet: String,
  pub vuln_lines: Vec<u32>,
  pub neutral_lines: Vec<u32>,
}

/// Contents of `<key>.info.yml`. Only `hints` is read; the file may carry
/// other fields (fix explanations etc.) that are ignored here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChallengeInfo {
  #[serde(default)]
  pub hints: Option<Vec<String>>,
}
