//! Loading service configuration from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! standard layout. See `AppConfig` and `HintTemplates` for the schema:
//!
//! ```toml
//! snippet_paths = ["./routes", "./lib"]
//! codefixes_dir = "./data/static/codefixes"
//! challenge_keys = ["loginAdminChallenge", "redirectChallenge"]
//!
//! [hints]
//! single_line = "Line {vulnLine} is the problem."
//! multiple_lines = "Lines {vulnLines} are the problem."
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

/// Roots scanned for annotated files when none are configured.
pub const SNIPPET_PATHS: [&str; 7] = [
  "./server.ts",
  "./routes",
  "./lib",
  "./data",
  "./data/static/web3-snippets",
  "./frontend/src/app",
  "./models",
];

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub snippet_paths: Vec<PathBuf>,
  /// Directory holding `<key>.info.yml` hint resources.
  pub codefixes_dir: PathBuf,
  /// Registry of legitimate challenge keys. When absent, the keys found in
  /// the snippet cache are the registry.
  pub challenge_keys: Option<Vec<String>>,
  pub hints: HintTemplates,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      snippet_paths: SNIPPET_PATHS.iter().map(PathBuf::from).collect(),
      codefixes_dir: PathBuf::from("./data/static/codefixes"),
      challenge_keys: None,
      hints: HintTemplates::default(),
    }
  }
}

/// Direct-disclosure sentences used once authored hints run out.
/// `{vulnLine}` / `{vulnLines}` are substituted.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HintTemplates {
  pub single_line: String,
  pub multiple_lines: String,
}

impl Default for HintTemplates {
  fn default() -> Self {
    Self {
      single_line: "Line {vulnLine} is responsible for this vulnerability or security flaw. Select it and submit to proceed.".into(),
      multiple_lines: "Lines {vulnLines} are responsible for this vulnerability or security flaw. Select them and submit to proceed.".into(),
    }
  }
}

pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Load `AppConfig` from FINDIT_CONFIG_PATH. On any parsing/IO error, falls back to defaults.
pub fn load_config_from_env() -> AppConfig {
  let Ok(path) = std::env::var("FINDIT_CONFIG_PATH") else {
    info!(target: "findit_backend", "FINDIT_CONFIG_PATH not set; using default snippet layout");
    return AppConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "findit_backend", %path, roots = cfg.snippet_paths.len(), "Loaded config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "findit_backend", %path, error = %e, "Failed to parse TOML config; using defaults");
        AppConfig::default()
      }
    },
    Err(e) => {
      error!(target: "findit_backend", %path, error = %e, "Failed to read TOML config file; using defaults");
      AppConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("parses");
    assert_eq!(cfg.snippet_paths.len(), SNIPPET_PATHS.len());
    assert_eq!(cfg.codefixes_dir, PathBuf::from("./data/static/codefixes"));
    assert!(cfg.challenge_keys.is_none());
    assert!(cfg.hints.single_line.contains("{vulnLine}"));
  }

  #[test]
  fn partial_overrides_keep_other_defaults() {
    let cfg = parse_config(
      r#"
snippet_paths = ["./src"]
challenge_keys = ["a", "b"]

[hints]
single_line = "Look at {vulnLine}."
"#,
    )
    .expect("parses");
    assert_eq!(cfg.snippet_paths, vec![PathBuf::from("./src")]);
    assert_eq!(cfg.challenge_keys, Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(cfg.hints.single_line, "Look at {vulnLine}.");
    assert!(cfg.hints.multiple_lines.contains("{vulnLines}"));
  }

  #[test]
  fn wrong_types_are_errors() {
    assert!(parse_config("snippet_paths = 3").is_err());
  }
}
