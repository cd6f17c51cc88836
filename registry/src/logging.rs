//! Structured logging initialisation for registry clients.
//!
//! Output is either human-readable lines for development or
//! newline-delimited JSON for log aggregation. The `RUST_LOG` environment
//! variable overrides the configured filter when set; otherwise the
//! caller-supplied `level` string applies (e.g. `"info"` or
//! `"debug,tcr_registry=trace"`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty-printed, coloured output for local development.
    Human,
    /// Newline-delimited JSON for production pipelines.
    Json,
}

impl LogFormat {
    /// Parse a config string ("human" or "json"); anything else is Human.
    pub fn from_config(s: &str) -> Self {
        match s {
            "json" => LogFormat::Json,
            _ => LogFormat::Human,
        }
    }
}

/// Initialise the global tracing subscriber.
///
/// # Panics
///
/// Panics if a global subscriber was already installed in this process.
pub fn init_logging(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Human => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true))
                .init();
        }
    }
}
