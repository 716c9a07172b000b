use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnippetError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnippetError {
    /// A declared challenge key whose start marker has no matching end marker.
    #[error("Broken code snippet boundaries for: {0}")]
    BrokenBoundary(String),

    #[error("No code challenge for challenge key: {0}")]
    NotFound(String),

    /// Only ever logged by the scanner; never fails a cache build.
    #[error("File {path} could not be read: {reason}")]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("Invalid challenge key")]
    InvalidSelection(String),
}

impl SnippetError {
    /// Stable name used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SnippetError::BrokenBoundary(_) => "BrokenBoundary",
            SnippetError::NotFound(_) => "NotFound",
            SnippetError::UnreadableFile { .. } => "UnreadableFile",
            SnippetError::InvalidSelection(_) => "InvalidSelection",
        }
    }
}
