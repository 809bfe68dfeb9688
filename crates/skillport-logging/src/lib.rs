//! Logging setup shared by every `skillport` entry point.
//!
//! Output always goes to stderr: when serving over stdio, stdout carries the
//! protocol stream and a stray log line would corrupt it.

#![deny(unsafe_code, dead_code, unused_imports, missing_docs)]

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// `RUST_LOG` wins over `level` when set. Returns an error instead of
/// panicking if a global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(())
}
