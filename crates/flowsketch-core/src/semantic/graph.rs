//! The validated flowchart graph.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::{
    identifier::Id,
    semantic::{Edge, Node},
};

/// Structural violations detected by [`Graph::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node id `{0}` is used more than once")]
    DuplicateNode(Id),

    #[error("edge id `{0}` is used more than once")]
    DuplicateEdge(Id),

    #[error("edge `{edge}` references unknown node `{node}`")]
    UnknownEndpoint { edge: Id, node: Id },
}

/// A flowchart: insertion-ordered nodes plus the edges between them.
///
/// Construction is checked, so every `Graph` value satisfies:
/// - node ids are unique
/// - edge ids are unique
/// - every edge endpoint names a node of the same graph
///
/// Self-loops, parallel edges and cycles are all allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph, rejecting the first structural violation found.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for duplicate ids or dangling edge endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::{identifier::Id, semantic::{Edge, Graph, Node, NodeKind}};
    ///
    /// let graph = Graph::new(
    ///     vec![
    ///         Node::new(Id::new("1"), NodeKind::Start, "Begin"),
    ///         Node::new(Id::new("2"), NodeKind::End, "Done"),
    ///     ],
    ///     vec![Edge::new(Id::new("e1"), Id::new("1"), Id::new("2"))],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(graph.nodes_count(), 2);
    /// ```
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut node_map = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id();
            if node_map.insert(id, node).is_some() {
                return Err(GraphError::DuplicateNode(id));
            }
        }

        let mut edge_ids = HashSet::with_capacity(edges.len());
        for edge in &edges {
            if !edge_ids.insert(edge.id()) {
                return Err(GraphError::DuplicateEdge(edge.id()));
            }
            for endpoint in [edge.source(), edge.target()] {
                if !node_map.contains_key(&endpoint) {
                    return Err(GraphError::UnknownEndpoint {
                        edge: edge.id(),
                        node: endpoint,
                    });
                }
            }
        }

        debug!(nodes = node_map.len(), edges = edges.len(); "Graph constructed");
        Ok(Self {
            nodes: node_map,
            edges,
        })
    }

    /// Returns the node with the given id, if any.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns the insertion index of the node with the given id.
    pub fn node_index(&self, id: Id) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = self.nodes.values().collect();
        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &self.edges)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::NodeKind;

    fn node(id: &str) -> Node {
        Node::new(Id::new(id), NodeKind::Process, format!("Step {id}"))
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge::new(Id::new(id), Id::new(source), Id::new(target))
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new(Vec::new(), Vec::new()).unwrap();

        assert!(graph.is_empty());
        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges_count(), 0);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let graph = Graph::new(vec![node("b"), node("a"), node("c")], Vec::new()).unwrap();

        let ids: Vec<String> = graph.nodes().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(graph.node_index(Id::new("a")), Some(1));
    }

    #[test]
    fn test_rejects_duplicate_node() {
        let err = Graph::new(vec![node("1"), node("1")], Vec::new()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode(Id::new("1")));
    }

    #[test]
    fn test_rejects_duplicate_edge() {
        let err = Graph::new(
            vec![node("1"), node("2")],
            vec![edge("e", "1", "2"), edge("e", "2", "1")],
        )
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateEdge(Id::new("e")));
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = Graph::new(vec![node("1")], vec![edge("e1", "1", "9")]).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownEndpoint {
                edge: Id::new("e1"),
                node: Id::new("9"),
            }
        );
    }

    #[test]
    fn test_accepts_self_loops_and_parallel_edges() {
        let graph = Graph::new(
            vec![node("1"), node("2")],
            vec![
                edge("a", "1", "2"),
                edge("b", "1", "2"),
                edge("c", "2", "2"),
            ],
        )
        .unwrap();

        assert_eq!(graph.edges_count(), 3);
        assert!(graph.edges().any(Edge::is_self_loop));
    }

    #[test]
    fn test_serializes_like_input_contract() {
        let graph = Graph::new(vec![node("1"), node("2")], vec![edge("e1", "1", "2")]).unwrap();
        let json = serde_json::to_value(&graph).unwrap();

        assert_eq!(json["nodes"][1]["id"], "2");
        assert_eq!(json["nodes"][1]["type"], "process");
        assert_eq!(json["edges"][0]["source"], "1");
        assert_eq!(json["edges"][0]["target"], "2");
    }
}
