//! In-process attempt/solve tracking for the "find it" phase.
//!
//! Attempts count every graded submission up to and including the one that
//! solves the challenge; later submissions leave the record untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttemptState {
    pub attempts: u32,
    pub solved: bool,
}

#[derive(Clone, Default)]
pub struct AccuracyTracker {
    by_key: Arc<RwLock<HashMap<String, AttemptState>>>,
}

impl AccuracyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn record_verdict(&self, key: &str, accepted: bool) {
        let state = {
            let mut by_key = self.by_key.write().await;
            let state = by_key.entry(key.to_string()).or_default();
            if state.solved {
                return;
            }
            state.attempts += 1;
            state.solved = accepted;
            *state
        };
        debug!(target: "challenge", %key, attempts = state.attempts, solved = state.solved, "Find-it verdict recorded");
    }

    pub async fn attempts(&self, key: &str) -> u32 {
        self.state(key).await.attempts
    }

    pub async fn is_solved(&self, key: &str) -> bool {
        self.state(key).await.solved
    }

    /// 1/attempts once solved.
    pub async fn accuracy(&self, key: &str) -> Option<f64> {
        let state = self.state(key).await;
        (state.solved && state.attempts > 0).then(|| 1.0 / state.attempts as f64)
    }

    async fn state(&self, key: &str) -> AttemptState {
        self.by_key.read().await.get(key).copied().unwrap_or_default()
    }
}
