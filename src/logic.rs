//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Serving a clean snippet for a challenge key
//!   - Listing the keys that have snippets
//!   - Grading a line selection, recording the attempt and attaching a hint on reject

use tracing::{debug, info, instrument};

use crate::error::{Result, SnippetError};
use crate::protocol::VerdictOut;
use crate::state::AppState;
use crate::verdict::verdict;

#[instrument(level = "info", skip(state), fields(%challenge_key))]
pub async fn retrieve_snippet(state: &AppState, challenge_key: &str) -> Result<String> {
  let entry = state.snippets.retrieve(challenge_key).await?;
  debug!(target: "snippet", %challenge_key, lines = entry.snippet.lines().count(), "Snippet served");
  Ok(entry.snippet.clone())
}

pub async fn list_challenge_keys(state: &AppState) -> Vec<String> {
  state.snippets.keys().await
}

/// Grade a submission. Errors are returned before anything is recorded.
#[instrument(level = "info", skip(state, selected_lines), fields(%key, selected = selected_lines.map_or(0, |s| s.len())))]
pub async fn check_selection(state: &AppState, key: &str, selected_lines: Option<&[u32]>) -> Result<VerdictOut> {
  if !state.is_known_challenge(key).await {
    return Err(SnippetError::InvalidSelection(key.to_string()));
  }
  let entry = state.snippets.retrieve(key).await?;

  if verdict(&entry.vuln_lines, &entry.neutral_lines, selected_lines) {
    let already_solved = state.accuracy.is_solved(key).await;
    state.accuracy.record_verdict(key, true).await;
    if already_solved {
      debug!(target: "challenge", %key, "Accepted submission for already solved challenge");
    } else if let Some(accuracy) = state.accuracy.accuracy(key).await {
      info!(target: "challenge", %key, accuracy = %format!("{:.2}", accuracy), "Find-it phase solved");
    }
    return Ok(VerdictOut { verdict: true, hint: None });
  }

  state.accuracy.record_verdict(key, false).await;
  let attempts = state.accuracy.attempts(key).await;
  let hint = state.hints.hint(key, &entry.vuln_lines, attempts);
  info!(target: "challenge", %key, attempts, has_hint = hint.is_some(), "Find-it submission rejected");
  Ok(VerdictOut { verdict: false, hint })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::tests::{StaticSource, BROKEN, LOGIN};
  use crate::config::AppConfig;
  use std::sync::Arc;

  fn state_with(cfg: AppConfig) -> AppState {
    AppState::with_source(StaticSource::new(&[("routes/login.ts", LOGIN), ("routes/redirect.ts", BROKEN)]), &cfg)
  }

  fn config_with_hints(dir: &std::path::Path) -> AppConfig {
    std::fs::write(dir.join("loginAdmin.info.yml"), "hints:\n  - \"Look at the query.\"\n").expect("write");
    AppConfig { codefixes_dir: dir.to_path_buf(), ..AppConfig::default() }
  }

  #[tokio::test]
  async fn accept_records_solve_without_hint() {
    let state = state_with(AppConfig::default());
    let out = check_selection(&state, "loginAdmin", Some(&[1, 2][..])).await.expect("graded");
    assert_eq!(out, VerdictOut { verdict: true, hint: None });
    assert_eq!(state.accuracy.attempts("loginAdmin").await, 1);
    assert_eq!(state.accuracy.accuracy("loginAdmin").await, Some(1.0));
  }

  #[tokio::test]
  async fn later_submissions_keep_the_first_solve() {
    let state = state_with(AppConfig::default());
    check_selection(&state, "loginAdmin", Some(&[2][..])).await.expect("graded");
    check_selection(&state, "loginAdmin", Some(&[1][..])).await.expect("graded");
    assert!(state.accuracy.is_solved("loginAdmin").await);

    let again = check_selection(&state, "loginAdmin", Some(&[1][..])).await.expect("graded");
    assert!(again.verdict);
    let after = check_selection(&state, "loginAdmin", Some(&[2][..])).await.expect("graded");
    assert!(!after.verdict);
    assert_eq!(state.accuracy.attempts("loginAdmin").await, 2);
    assert_eq!(state.accuracy.accuracy("loginAdmin").await, Some(0.5));
  }

  #[tokio::test]
  async fn rejects_walk_through_hints_then_disclose() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let state = state_with(config_with_hints(dir.path()));

    let first = check_selection(&state, "loginAdmin", Some(&[2][..])).await.expect("graded");
    assert!(!first.verdict);
    assert_eq!(first.hint.as_deref(), Some("Look at the query."));

    let second = check_selection(&state, "loginAdmin", None).await.expect("graded");
    assert!(!second.verdict);
    assert!(second.hint.unwrap().starts_with("Line 1 is responsible"));
    assert_eq!(state.accuracy.attempts("loginAdmin").await, 2);
  }

  #[tokio::test]
  async fn unknown_key_is_invalid_and_leaves_no_trace() {
    let state = state_with(AppConfig::default());
    let err = check_selection(&state, "nope", Some(&[1][..])).await.unwrap_err();
    assert_eq!(err, SnippetError::InvalidSelection("nope".into()));
    let err = check_selection(&state, "", Some(&[1][..])).await.unwrap_err();
    assert_eq!(err, SnippetError::InvalidSelection("".into()));
    assert_eq!(state.accuracy.attempts("nope").await, 0);
  }

  #[tokio::test]
  async fn broken_and_missing_snippets_do_not_count_attempts() {
    let cfg = AppConfig {
      challenge_keys: Some(vec!["loginAdmin".into(), "brokenOne".into(), "scoreBoard".into()]),
      ..AppConfig::default()
    };
    let state = state_with(cfg);

    let err = check_selection(&state, "brokenOne", Some(&[1][..])).await.unwrap_err();
    assert_eq!(err, SnippetError::BrokenBoundary("brokenOne".into()));
    let err = check_selection(&state, "scoreBoard", Some(&[1][..])).await.unwrap_err();
    assert_eq!(err, SnippetError::NotFound("scoreBoard".into()));
    // Has a snippet, but is not in the configured registry.
    let err = check_selection(&state, "redirect", Some(&[1][..])).await.unwrap_err();
    assert_eq!(err, SnippetError::InvalidSelection("redirect".into()));

    assert_eq!(state.accuracy.attempts("brokenOne").await, 0);
    assert_eq!(state.accuracy.attempts("scoreBoard").await, 0);
  }

  #[tokio::test]
  async fn snippet_lookup_and_listing() {
    let state = AppState::with_source(Arc::new(crate::scanner::Scanner::new(vec![])), &AppConfig::default());
    assert!(list_challenge_keys(&state).await.is_empty());

    let state = state_with(AppConfig::default());
    let snippet = retrieve_snippet(&state, "loginAdmin").await.expect("snippet");
    assert!(!snippet.contains("vuln-code-snippet"));
    assert_eq!(snippet.lines().count(), 2);
    assert_eq!(list_challenge_keys(&state).await, vec!["brokenOne", "loginAdmin", "redirect"]);
  }
}
