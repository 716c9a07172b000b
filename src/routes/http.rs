//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and log include parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{debug, error, info, instrument, warn};

use crate::error::SnippetError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

/// Shown to learners instead of anything that could leak file paths.
const BROKEN_CHALLENGE_MESSAGE: &str = "This coding challenge cannot be loaded right now.";

impl IntoResponse for SnippetError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      SnippetError::BrokenBoundary(key) => {
        error!(target: "snippet", %key, "Serving 422 for challenge with broken snippet boundaries");
        (StatusCode::UNPROCESSABLE_ENTITY, BROKEN_CHALLENGE_MESSAGE.to_string())
      }
      SnippetError::NotFound(key) => {
        debug!(target: "snippet", %key, "No snippet for key");
        (StatusCode::NOT_FOUND, self.to_string())
      }
      SnippetError::InvalidSelection(key) => {
        debug!(target: "challenge", %key, "Rejected submission for unknown key");
        (StatusCode::BAD_REQUEST, self.to_string())
      }
      SnippetError::UnreadableFile { .. } => {
        warn!(target: "snippet", kind = self.kind(), error = %self, "Unreadable file surfaced to HTTP layer");
        (StatusCode::INTERNAL_SERVER_ERROR, BROKEN_CHALLENGE_MESSAGE.to_string())
      }
    };
    (status, Json(ErrorOut { status: "error", error: message })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_challenges(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let challenges = list_challenge_keys(&state).await;
  info!(target: "snippet", count = challenges.len(), "HTTP challenge keys served");
  Json(ChallengesOut { challenges })
}

#[instrument(level = "info", skip(state), fields(%challenge))]
pub async fn http_get_snippet(
  State(state): State<Arc<AppState>>,
  Path(challenge): Path<String>,
) -> Result<Json<SnippetOut>, SnippetError> {
  let snippet = retrieve_snippet(&state, &challenge).await?;
  Ok(Json(SnippetOut { snippet }))
}

/// A body that does not deserialize (wrong field types, bad JSON) is graded
/// like an unknown key: 400 with the usual error envelope.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_verdict(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<VerdictIn>, JsonRejection>,
) -> Result<Json<VerdictOut>, SnippetError> {
  let body = match payload {
    Ok(Json(body)) => body,
    Err(rejection) => {
      debug!(target: "challenge", error = %rejection.body_text(), "Malformed verdict body");
      return Err(SnippetError::InvalidSelection(String::new()));
    }
  };
  let out = check_selection(&state, &body.key, body.selected_lines.as_deref()).await?;
  info!(target: "challenge", key = %body.key, verdict = out.verdict, "HTTP verdict evaluated");
  Ok(Json(out))
}
