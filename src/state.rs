//! Application state: snippet cache, attempt tracker, hint generator and the
//! registry of legitimate challenge keys.
//!
//! Everything here is cheap to clone and shared behind `Arc`s; handlers
//! receive `Arc<AppState>`.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::accuracy::AccuracyTracker;
use crate::cache::SnippetCache;
use crate::config::AppConfig;
use crate::hints::HintGenerator;
use crate::scanner::{Scanner, SnippetSource};

#[derive(Clone)]
pub struct AppState {
    pub snippets: SnippetCache,
    pub accuracy: AccuracyTracker,
    pub hints: HintGenerator,
    /// Configured registry; `None` means "whatever the cache knows".
    pub registry: Option<Arc<HashSet<String>>>,
}

impl AppState {
    /// Build state from config. Nothing is scanned until the first request.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: &AppConfig) -> Self {
        let scanner = Scanner::new(cfg.snippet_paths.clone());
        for root in &cfg.snippet_paths {
            info!(target: "findit_backend", root = %root.display(), "Snippet root configured");
        }
        Self::with_source(Arc::new(scanner), cfg)
    }

    pub fn with_source(source: Arc<dyn SnippetSource>, cfg: &AppConfig) -> Self {
        let registry = cfg
            .challenge_keys
            .as_ref()
            .map(|keys| Arc::new(keys.iter().cloned().collect::<HashSet<_>>()));
        if let Some(r) = &registry {
            info!(target: "findit_backend", keys = r.len(), "Challenge registry loaded from config");
        }
        Self {
            snippets: SnippetCache::new(source),
            accuracy: AccuracyTracker::new(),
            hints: HintGenerator::new(cfg.codefixes_dir.clone(), cfg.hints.clone()),
            registry,
        }
    }

    /// Is `key` a legitimate challenge at all (independent of having a snippet)?
    pub async fn is_known_challenge(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match &self.registry {
            Some(registry) => registry.contains(key),
            None => self.snippets.contains(key).await,
        }
    }
}
