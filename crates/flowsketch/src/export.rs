//! Export of computed layouts.
//!
//! This module provides the [`Exporter`] trait, the final stage of the
//! Flowsketch pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ parse
//! Graph
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! JSON / SVG
//! ```
//!
//! # Available Backends
//!
//! - [`json`] - The layout as pretty-printed JSON, for interactive render surfaces
//! - [`svg`] - A static SVG preview
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`FlowsketchError::Export`] at the crate boundary.
//!
//! [`FlowsketchError::Export`]: crate::FlowsketchError::Export

pub mod json;
pub mod svg;

use crate::layout::Layout;

/// Abstraction for layout export backends.
pub trait Exporter {
    /// Writes `layout` in the backend's format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted,
    /// [`Error::Json`] if serialization fails, or [`Error::Io`] if writing
    /// the output fails.
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
    /// A serialization failure.
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
