//! Layered layout of flowcharts.
//!
//! This module turns a validated [`Graph`] into positioned nodes and routed
//! edges ready for rendering.
//!
//! # Pipeline Position
//!
//! ```text
//! Semantic Model (Graph)
//!     ↓ structure
//! FlowGraph
//!     ↓ layout (this module)
//! Layout
//!     ↓ export
//! JSON / SVG
//! ```
//!
//! # Stages
//!
//! 1. Split the graph into weakly connected components.
//! 2. Classify back-edges and self-loops ([`EdgeKind`]).
//! 3. Rank nodes by longest path over forward edges.
//! 4. Insert virtual nodes on edges spanning several ranks.
//! 5. Reduce crossings with barycenter sweeps.
//! 6. Assign coordinates on a uniform slot grid.
//! 7. Route edges between anchor points.
//!
//! Everything is computed top-to-bottom and transposed at the end for
//! [`Direction::LeftToRight`].
//!
//! [`Graph`]: flowsketch_core::semantic::Graph

mod acyclic;
mod engine;
mod layers;
mod order;
mod position;
mod rank;
mod routing;

pub use engine::{Engine, EngineBuilder};

use serde::{Deserialize, Serialize};

use flowsketch_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::{Edge, Node, NodeKind},
};

/// Flow direction of the ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks grow downwards.
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopToBottom,

    /// Ranks grow to the right.
    #[serde(rename = "LR", alias = "lr")]
    LeftToRight,
}

impl Direction {
    /// Returns `true` when the rank axis is horizontal.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight)
    }
}

/// How an edge takes part in the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Ranked edge pointing from a lower to a higher rank.
    Forward,
    /// Edge closing a cycle. It is ignored by ranking and drawn on the
    /// trailing side.
    Back,
    /// Edge from a node to itself.
    SelfLoop,
}

/// Fixed node sizes per [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSizes {
    start: Size,
    end: Size,
    process: Size,
    decision: Size,
}

impl NodeSizes {
    /// Uses `size` for every kind.
    pub fn uniform(size: Size) -> Self {
        Self {
            start: size,
            end: size,
            process: size,
            decision: size,
        }
    }

    /// Replaces the size used for `kind`.
    pub fn with_size(mut self, kind: NodeKind, size: Size) -> Self {
        *self.slot_mut(kind) = size;
        self
    }

    /// Returns the size used for `kind`.
    pub fn get(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Start => self.start,
            NodeKind::End => self.end,
            NodeKind::Process => self.process,
            NodeKind::Decision => self.decision,
        }
    }

    fn slot_mut(&mut self, kind: NodeKind) -> &mut Size {
        match kind {
            NodeKind::Start => &mut self.start,
            NodeKind::End => &mut self.end,
            NodeKind::Process => &mut self.process,
            NodeKind::Decision => &mut self.decision,
        }
    }
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self::uniform(Size::new(140.0, 50.0))
    }
}

/// A node with its final rank, order and box.
///
/// `x` and `y` are the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    id: Id,
    #[serde(rename = "type")]
    kind: NodeKind,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    rank: usize,
    order: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PositionedNode {
    fn new(node: &Node, rank: usize, order: usize, top_left: Point, size: Size) -> Self {
        Self {
            id: node.id(),
            kind: node.kind(),
            label: node.label().to_string(),
            detail: node.detail().map(str::to_string),
            source: node.source().map(str::to_string),
            rank,
            order,
            x: top_left.x(),
            y: top_left.y(),
            width: size.width(),
            height: size.height(),
        }
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

    /// Rank index, counted from 0 within the node's component.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Position among the real nodes of the same rank and component.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position(), self.size())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// An edge with its anchors and polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    id: Id,
    source: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    kind: EdgeKind,
    source_anchor: Point,
    target_anchor: Point,
    points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label_position: Option<Point>,
}

impl RoutedEdge {
    fn new(edge: &Edge, kind: EdgeKind, points: Vec<Point>) -> Self {
        let source_anchor = points.first().copied().unwrap_or_default();
        let target_anchor = points.last().copied().unwrap_or_default();
        let label_position = edge.label().map(|_| middle_segment_midpoint(&points));
        Self {
            id: edge.id(),
            source: edge.source(),
            target: edge.target(),
            label: edge.label().map(str::to_string),
            kind,
            source_anchor,
            target_anchor,
            points,
            label_position,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn source_anchor(&self) -> Point {
        self.source_anchor
    }

    pub fn target_anchor(&self) -> Point {
        self.target_anchor
    }

    /// Polyline from the source anchor to the target anchor, both included.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn label_position(&self) -> Option<Point> {
        self.label_position
    }
}

/// Midpoint of the middle segment of a polyline.
///
/// With an even number of segments the earlier of the two middle ones is used.
fn middle_segment_midpoint(points: &[Point]) -> Point {
    match points {
        [] => Point::default(),
        [only] => *only,
        _ => {
            let segment = (points.len() - 2) / 2;
            points[segment].midpoint(points[segment + 1])
        }
    }
}

/// The computed layout of a whole graph.
///
/// Nodes and edges keep the graph's insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    direction: Direction,
    width: f32,
    height: f32,
    ranks: Vec<usize>,
    nodes: Vec<PositionedNode>,
    edges: Vec<RoutedEdge>,
}

impl Layout {
    fn empty(direction: Direction) -> Self {
        Self {
            direction,
            width: 0.0,
            height: 0.0,
            ranks: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RoutedEdge] {
        &self.edges
    }

    pub fn node(&self, id: impl Into<Id>) -> Option<&PositionedNode> {
        let id = id.into();
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: impl Into<Id>) -> Option<&RoutedEdge> {
        let id = id.into();
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Size of the smallest box at the origin containing every node and edge point.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Number of ranks of each component, in component order.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
