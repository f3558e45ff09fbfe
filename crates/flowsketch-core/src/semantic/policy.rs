//! Validation policies for lenient handling of AI-generated input.

use serde::Deserialize;

/// What to do with a node whose `type` is not a known [`NodeKind`].
///
/// [`NodeKind`]: super::NodeKind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKindPolicy {
    /// Treat the node as a process step and log a warning (default)
    #[default]
    Coerce,
    /// Fail validation with a schema error
    Reject,
}

/// What to do with a node whose label is missing or blank.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLabelPolicy {
    /// Fail validation with an incomplete-node error (default)
    #[default]
    Reject,
    /// Use the node id as its label and log a warning
    Placeholder,
}
