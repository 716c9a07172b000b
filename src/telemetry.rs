//! Log subscriber setup for the snippet backend.
//!
//! `LOG_LEVEL` takes a full `EnvFilter` directive string and replaces the
//! default filter below. `LOG_FORMAT=json` switches to one JSON object per
//! event; anything else keeps the human-readable format.
//!
//! Targets emitted by this crate:
//! - `findit_backend`: startup, shutdown, config loading
//! - `snippet`: file scanning, extraction, the snippet cache
//! - `challenge`: grading, hints, attempt tracking

use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Snippet and grading targets at debug, HTTP plumbing at info.
fn default_filter() -> EnvFilter {
    EnvFilter::new("info,snippet=debug,challenge=debug,findit_backend=debug,tower_http=info,axum=info")
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| default_filter());
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}
