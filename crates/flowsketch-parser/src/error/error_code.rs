//! Error codes for the Flowsketch diagnostic system.
//!
//! Codes are grouped by the stage that reports them:
//! - `E0xx` - Format errors (the payload is not JSON)
//! - `E1xx` - Schema errors (the JSON does not have the flowchart shape)
//! - `E2xx` - Validation errors (ids and references)
//! - `W3xx` - Warnings (the payload was repaired or looks suspicious)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Format Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The payload, after removing any code fence, is not valid JSON.
    E001,

    // =========================================================================
    // Schema Errors (E1xx)
    // =========================================================================
    /// Missing collection.
    ///
    /// The payload is not an object, or its `nodes` or `edges` member is
    /// missing or not an array.
    E100,

    /// Malformed element.
    ///
    /// An element of `nodes` or `edges` does not have the expected record
    /// shape, for example a missing `source` or an id that is neither a
    /// string nor an integer.
    E101,

    /// Unknown node type.
    ///
    /// A node `type` is not one of `start`, `end`, `process` or `decision`
    /// and unknown types are configured to be rejected.
    E102,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Duplicate id.
    ///
    /// Two nodes, or two edges, share the same id.
    E200,

    /// Dangling edge.
    ///
    /// An edge references a node id that does not exist.
    E201,

    /// Incomplete node.
    ///
    /// A node has no label, or only whitespace.
    E202,

    // =========================================================================
    // Warnings (W3xx)
    // =========================================================================
    /// Orphan node.
    ///
    /// A node has no incoming or outgoing edge.
    W300,

    /// Node type coerced.
    ///
    /// An unknown node `type` was replaced by `process`.
    W301,

    /// Placeholder label.
    ///
    /// A node without a label was given its id as label.
    W302,
}

/// The category of a failure, as reported to a host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The payload is not JSON
    Format,
    /// The JSON does not have the flowchart shape
    Schema,
    /// Two nodes or two edges share an id
    DuplicateId,
    /// An edge points at a node that does not exist
    DanglingEdge,
    /// A node lacks a label
    IncompleteNode,
}

impl ErrorKind {
    /// Returns the name of this kind (e.g., "DuplicateIdError").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Format => "FormatError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::DuplicateId => "DuplicateIdError",
            ErrorKind::DanglingEdge => "DanglingEdgeError",
            ErrorKind::IncompleteNode => "IncompleteNodeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::W300 => "W300",
            ErrorCode::W301 => "W301",
            ErrorCode::W302 => "W302",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E100 => "missing collection",
            ErrorCode::E101 => "malformed element",
            ErrorCode::E102 => "unknown node type",
            ErrorCode::E200 => "duplicate id",
            ErrorCode::E201 => "dangling edge",
            ErrorCode::E202 => "incomplete node",
            ErrorCode::W300 => "orphan node",
            ErrorCode::W301 => "node type coerced",
            ErrorCode::W302 => "placeholder label",
        }
    }

    /// Returns the failure category, or `None` for warning codes.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ErrorCode::E001 => Some(ErrorKind::Format),
            ErrorCode::E100 | ErrorCode::E101 | ErrorCode::E102 => Some(ErrorKind::Schema),
            ErrorCode::E200 => Some(ErrorKind::DuplicateId),
            ErrorCode::E201 => Some(ErrorKind::DanglingEdge),
            ErrorCode::E202 => Some(ErrorKind::IncompleteNode),
            ErrorCode::W300 | ErrorCode::W301 | ErrorCode::W302 => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
