//! Semantic model of a validated flowchart.
//!
//! These types are produced by the parser once untrusted input has been
//! checked, and consumed read-only by the layout engine and exporters:
//!
//! - [`NodeKind`] - The closed set of node kinds
//! - [`Node`] / [`Edge`] - Flowchart elements
//! - [`Graph`] - Insertion-ordered nodes plus edges, with checked construction
//! - [`UnknownKindPolicy`] / [`MissingLabelPolicy`] - How lenient validation is

mod edge;
mod graph;
mod node;
mod policy;

pub use edge::Edge;
pub use graph::{Graph, GraphError};
pub use node::{Node, NodeKind, UnknownNodeKind};
pub use policy::{MissingLabelPolicy, UnknownKindPolicy};
