// src/logging.rs

//! Diagnostic logging through `tracing`.
//!
//! `--log-level` wins. Without it, `REBAKE_LOG` is read as an `EnvFilter`
//! directive string, so both `debug` and `rebake::exec=trace,warn` work.
//! Otherwise only warnings and errors are shown.
//!
//! Everything goes to stderr: stdout belongs to the status lines and to
//! `recipes` / `deps` output.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;
use crate::errors::Result;

pub const LOG_ENV: &str = "REBAKE_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.directive()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
