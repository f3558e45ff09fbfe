//! Error and diagnostic system for the graph model builder.
//!
//! Every failure found while turning text into a graph is reported as a
//! [`Diagnostic`] with an [`ErrorCode`], a message and labelled spans into
//! the original text. Validation keeps going after the first failure, so a
//! [`ParseError`] usually carries every problem of a payload at once.
//!
//! # Example
//!
//! ```
//! # use flowsketch_parser::error::{Diagnostic, ErrorCode, ErrorKind};
//! # use flowsketch_parser::Span;
//!
//! let diag = Diagnostic::error("duplicate node id `1`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..70), "duplicate node")
//!     .with_secondary_label(Span::new(10..38), "first defined here")
//!     .with_help("give every node a unique id");
//!
//! assert_eq!(diag.code().and_then(|code| code.kind()), Some(ErrorKind::DuplicateId));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
