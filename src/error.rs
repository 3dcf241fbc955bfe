//! Errors raised while loading a document or configuration.
//!
//! Interactive features never fail the reader: a missing section is a no-op and a clipboard
//! failure is shown as transient state. Only start-up paths return these.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop the reader from starting.
#[derive(Error, Debug)]
pub enum Error {
    /// The document or a config file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file exists but is not valid TOML for [`crate::config::Config`].
    #[error("invalid config in {path:?}: {reason}")]
    Config {
        /// Offending config file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The markdown grammar could not be loaded into the parser.
    #[error("markdown grammar unavailable: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// A tree-sitter query failed to compile.
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    /// The parser returned no tree for the document.
    #[error("failed to parse document")]
    Parse,

    /// A syntax node spanned bytes that are not valid UTF-8.
    #[error("document text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Terminal or log-file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Search results could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
