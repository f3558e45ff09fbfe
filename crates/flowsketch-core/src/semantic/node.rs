//! Flowchart nodes and their kinds.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::identifier::Id;

/// The kind of a flowchart node.
///
/// The kind decides the node's shape and default size. Anything the input
/// does not name explicitly is a [`NodeKind::Process`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point of the flow
    Start,
    /// Terminal step of the flow
    End,
    /// Ordinary step (default)
    #[default]
    Process,
    /// Branching question whose outgoing edges are usually labelled
    Decision,
}

impl NodeKind {
    /// All kinds, in declaration order.
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Process,
        NodeKind::Decision,
    ];

    /// Returns the canonical lowercase name used in input and output JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Process => "process",
            Self::Decision => "decision",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no [`NodeKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind `{0}`")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    /// Parses a kind name, ignoring ASCII case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::semantic::NodeKind;
    ///
    /// assert_eq!(" Decision ".parse::<NodeKind>(), Ok(NodeKind::Decision));
    /// assert!("subroutine".parse::<NodeKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownNodeKind(trimmed.to_string()))
    }
}

/// A flowchart node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: Id,
    #[serde(rename = "type")]
    kind: NodeKind,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl Node {
    /// Creates a node without detail or source reference.
    pub fn new(id: Id, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            detail: None,
            source: None,
        }
    }

    /// Attaches longer descriptive text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attaches a reference into the analysed document (e.g. `"Page 3"`).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` ({})", self.kind, self.id, self.label)
    }
}
