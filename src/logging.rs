//! Structured logging to a file.
//!
//! The reader owns the terminal's alternate screen, so events go to a log file rather than
//! stderr. `WAYFINDER_LOG` (or `RUST_LOG`) overrides the level chosen on the command line.

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "WAYFINDER_LOG";

#[must_use]
/// Default log destination in the system temp directory.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("wayfinder.log")
}

/// Initialise tracing, appending to `path`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_tracing(verbose: bool, path: &Path) -> Result<()> {
    let level = if verbose {
        "wayfinder=debug"
    } else {
        "wayfinder=info"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // A second initialisation (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init();

    Ok(())
}
