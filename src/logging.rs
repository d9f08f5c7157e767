//! Diagnostic logging through `tracing`, written to stderr so listings on
//! stdout stay machine-readable.
//!
//! The level comes from `-v` flags unless `RUST_LOG` is set. Setting
//! `ARTIFACT_ANALYZER_LOG_JSON=true` switches to JSON lines.

use std::env;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map repeated `-v` flags to a level: none → WARN, 1 → INFO, 2 → DEBUG, 3+ → TRACE.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn json_requested() -> bool {
    env::var("ARTIFACT_ANALYZER_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("artifact_analyzer={level},warn")));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json_requested() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}
