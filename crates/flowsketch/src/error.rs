//! Error types for Flowsketch operations.
//!
//! [`FlowsketchError`] wraps everything that can fail while turning
//! flowchart text into rendered output. Layout itself cannot fail.

use std::io;

use thiserror::Error;

use flowsketch_parser::ParseError;

/// The main error type for Flowsketch operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so that
/// callers can render labels against it.
#[derive(Debug, Error)]
pub enum FlowsketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for FlowsketchError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl FlowsketchError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
