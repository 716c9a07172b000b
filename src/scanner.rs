//! Enumerates source files that carry challenge markers.
//!
//! The scanner walks every configured root (file or directory), reads each
//! file and keeps only those containing a start marker. Unreadable entries are
//! logged and skipped; they never fail the scan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::domain::FileMatch;
use crate::error::SnippetError;
use crate::markers::has_start_marker;

/// Anything that can hand annotated files to the snippet cache.
pub trait SnippetSource: Send + Sync + 'static {
    fn annotated_files(&self) -> Vec<FileMatch>;
}

/// File-system backed source rooted at a set of paths.
#[derive(Clone, Debug)]
pub struct Scanner {
    roots: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    fn read_candidate(&self, path: &Path) -> Result<Option<FileMatch>, SnippetError> {
        let bytes = std::fs::read(path).map_err(|e| SnippetError::UnreadableFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let content = String::from_utf8_lossy(&bytes);
        if !has_start_marker(&content) {
            return Ok(None);
        }
        Ok(Some(FileMatch {
            path: path.to_path_buf(),
            content: content.into_owned(),
        }))
    }
}

impl SnippetSource for Scanner {
    #[instrument(level = "info", skip(self), fields(roots = self.roots.len()))]
    fn annotated_files(&self) -> Vec<FileMatch> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut matches = Vec::new();
        let mut visited = 0usize;

        for root in &self.roots {
            if !root.exists() {
                warn!(target: "snippet", root = %root.display(), "Snippet root does not exist; skipping");
                continue;
            }
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(target: "snippet", root = %root.display(), error = %e, "Could not walk directory entry; skipping");
                        continue;
                    }
                };
                if entry.file_type().is_dir() {
                    continue;
                }
                let path = entry.path();
                // Overlapping roots (./data and ./data/static/...) reach the same file twice.
                let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
                if !seen.insert(canonical) {
                    continue;
                }
                visited += 1;
                match self.read_candidate(path) {
                    Ok(Some(m)) => {
                        debug!(target: "snippet", path = %path.display(), "Found annotated file");
                        matches.push(m);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(target: "snippet", path = %path.display(), error = %e, "File could not be read. It might have been moved or deleted. If coding challenges are contained in the file, they will not be available.");
                    }
                }
            }
        }

        info!(target: "snippet", visited, annotated = matches.len(), "Snippet scan finished");
        matches
    }
}
