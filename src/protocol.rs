//! Public protocol structs for HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SnippetOut {
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengesOut {
    pub challenges: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerdictIn {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "selectedLines", default)]
    pub selected_lines: Option<Vec<u32>>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct VerdictOut {
    pub verdict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub status: &'static str,
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
