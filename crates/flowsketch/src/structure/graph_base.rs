//! Low-level graph data structures and primitives.
//!
//! This module provides the index-based directed graph the layout engine
//! works on. Nodes are keyed by [`Id`] but stored in insertion order, so
//! every traversal is deterministic.
//!
//! # Architecture
//!
//! - [`NodeIndex`] / [`EdgeIndex`]: dense indices in insertion order
//! - [`GraphInternal`]: node and edge storage with incoming and outgoing
//!   adjacency lists per node
//!
//! Self-loops and multiple edges between the same pair of nodes are kept.

use indexmap::IndexMap;

use flowsketch_core::identifier::Id;

// =============================================================================
// Low-level primitive types and internal data structures
// =============================================================================

/// Index of a node, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    #[cfg(test)]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EdgeIndex(usize);

impl EdgeIndex {
    #[cfg(test)]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A directed edge with its associated value.
#[derive(Debug)]
struct EdgeRecord<E> {
    source: NodeIndex,
    target: NodeIndex,
    value: E,
}

// =============================================================================
// Core internal graph structure
// =============================================================================

/// Directed graph with generic node data `N` and edge data `E`.
#[derive(Debug)]
pub(crate) struct GraphInternal<N, E> {
    nodes: IndexMap<Id, N>,
    edges: Vec<EdgeRecord<E>>,
    incoming: Vec<Vec<EdgeIndex>>,
    outgoing: Vec<Vec<EdgeIndex>>,
}

impl<N, E> Default for GraphInternal<N, E> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

impl<N, E> GraphInternal<N, E> {
    /// Creates a new empty graph.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    ///
    /// If a node with the same ID already exists, its data is replaced and
    /// it keeps its index.
    pub(crate) fn add_node(&mut self, id: Id, node: N) -> NodeIndex {
        let (index, previous) = self.nodes.insert_full(id, node);
        if previous.is_none() {
            self.incoming.push(Vec::new());
            self.outgoing.push(Vec::new());
        }
        NodeIndex(index)
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Panics
    /// Panics in debug mode if either endpoint is out of range.
    pub(crate) fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, edge: E) -> EdgeIndex {
        debug_assert!(source.0 < self.nodes.len(), "source {source:?} out of range");
        debug_assert!(target.0 < self.nodes.len(), "target {target:?} out of range");

        let index = EdgeIndex(self.edges.len());
        self.edges.push(EdgeRecord {
            source,
            target,
            value: edge,
        });
        self.outgoing[source.0].push(index);
        self.incoming[target.0].push(index);
        index
    }

    /// Returns the index of the node with the given ID, if it exists.
    pub(crate) fn node_index(&self, id: Id) -> Option<NodeIndex> {
        self.nodes.get_index_of(&id).map(NodeIndex)
    }

    /// Returns the data of a node.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub(crate) fn node(&self, index: NodeIndex) -> &N {
        &self.nodes[index.0]
    }

    /// Returns an iterator over all node indices in insertion order.
    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// Returns the total number of nodes in the graph.
    pub(crate) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the data of an edge.
    pub(crate) fn edge(&self, index: EdgeIndex) -> &E {
        &self.edges[index.0].value
    }

    /// Returns the `(source, target)` of an edge.
    pub(crate) fn endpoints(&self, index: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let record = &self.edges[index.0];
        (record.source, record.target)
    }

    /// Returns an iterator over all edge indices in insertion order.
    pub(crate) fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    /// Returns the total number of edges in the graph.
    pub(crate) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `index`, in insertion order.
    pub(crate) fn outgoing(&self, index: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[index.0]
    }

    /// Edges entering `index`, in insertion order.
    pub(crate) fn incoming(&self, index: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[index.0]
    }

    /// Returns an iterator over root nodes, in insertion order.
    ///
    /// A root has no incoming edge from another node; self-loops do not count.
    pub(crate) fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node_indices().filter(|&node| {
            self.incoming(node)
                .iter()
                .all(|&edge| self.endpoints(edge).0 == node)
        })
    }

    /// Nodes adjacent to `index` in either direction, self excluded.
    pub(crate) fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let out = self.outgoing(index).iter().map(|&edge| self.endpoints(edge).1);
        let inc = self.incoming(index).iter().map(|&edge| self.endpoints(edge).0);
        out.chain(inc).filter(move |&other| other != index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test node data structure with a simple numeric value
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestNode {
        value: u32,
    }

    /// Test edge data structure with a weight attribute
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestEdge {
        weight: i32,
    }

    fn graph_with_nodes(names: &[&str]) -> GraphInternal<TestNode, TestEdge> {
        let mut graph = GraphInternal::new();
        for (i, name) in names.iter().enumerate() {
            graph.add_node(Id::new(name), TestNode { value: i as u32 });
        }
        graph
    }

    #[test]
    fn test_index_creation() {
        assert_eq!(NodeIndex::new(5), NodeIndex::new(5));
        assert_ne!(NodeIndex::new(5), NodeIndex::new(10));
        assert_eq!(EdgeIndex::new(3).index(), 3);
    }

    #[test]
    fn test_graph_new() {
        let graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges_count(), 0);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_add_node() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let first = graph.add_node(Id::new("node1"), TestNode { value: 10 });
        let second = graph.add_node(Id::new("node2"), TestNode { value: 20 });

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(graph.node(second), &TestNode { value: 20 });
        assert_eq!(graph.node_index(Id::new("node2")), Some(second));
        assert_eq!(graph.node_index(Id::new("missing")), None);
    }

    #[test]
    fn test_add_node_replaces_existing() {
        let mut graph: GraphInternal<TestNode, TestEdge> = GraphInternal::new();
        let first = graph.add_node(Id::new("node"), TestNode { value: 1 });
        let again = graph.add_node(Id::new("node"), TestNode { value: 2 });

        assert_eq!(first, again);
        assert_eq!(graph.nodes_count(), 1);
        assert_eq!(graph.node(first).value, 2);
    }

    #[test]
    fn test_node_indices_follow_insertion_order() {
        let graph = graph_with_nodes(&["z", "a", "m"]);
        let indices: Vec<NodeIndex> = graph.node_indices().collect();

        assert_eq!(indices, vec![NodeIndex(0), NodeIndex(1), NodeIndex(2)]);
        assert_eq!(graph.node_index(Id::new("m")), Some(NodeIndex(2)));
    }

    #[test]
    fn test_add_edge() {
        let mut graph = graph_with_nodes(&["source", "target"]);
        let edge = graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 5 });

        assert_eq!(graph.edge(edge), &TestEdge { weight: 5 });
        assert_eq!(graph.endpoints(edge), (NodeIndex(0), NodeIndex(1)));
        assert_eq!(graph.outgoing(NodeIndex(0)), &[edge]);
        assert_eq!(graph.incoming(NodeIndex(1)), &[edge]);
        assert!(graph.incoming(NodeIndex(0)).is_empty());
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 1 });
        graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 2 });

        assert_eq!(graph.edges_count(), 2);
        assert_eq!(graph.outgoing(NodeIndex(0)).len(), 2);
    }

    #[test]
    fn test_roots() {
        let mut graph = graph_with_nodes(&["root1", "root2", "child"]);
        graph.add_edge(NodeIndex(0), NodeIndex(2), TestEdge { weight: 1 });

        let roots: Vec<NodeIndex> = graph.roots().collect();
        assert_eq!(roots, vec![NodeIndex(0), NodeIndex(1)]);
    }

    #[test]
    fn test_roots_ignore_self_loops() {
        let mut graph = graph_with_nodes(&["looping", "child"]);
        graph.add_edge(NodeIndex(0), NodeIndex(0), TestEdge { weight: 1 });
        graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 1 });

        let roots: Vec<NodeIndex> = graph.roots().collect();
        assert_eq!(roots, vec![NodeIndex(0)]);
    }

    #[test]
    fn test_cycle_has_no_roots() {
        let mut graph = graph_with_nodes(&["a", "b"]);
        graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 1 });
        graph.add_edge(NodeIndex(1), NodeIndex(0), TestEdge { weight: 1 });

        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_neighbors() {
        let mut graph = graph_with_nodes(&["a", "b", "c", "isolated"]);
        graph.add_edge(NodeIndex(0), NodeIndex(1), TestEdge { weight: 1 });
        graph.add_edge(NodeIndex(2), NodeIndex(0), TestEdge { weight: 1 });
        graph.add_edge(NodeIndex(0), NodeIndex(0), TestEdge { weight: 1 });

        let neighbors: Vec<NodeIndex> = graph.neighbors(NodeIndex(0)).collect();
        assert_eq!(neighbors, vec![NodeIndex(1), NodeIndex(2)]);
        assert_eq!(graph.neighbors(NodeIndex(3)).count(), 0);
    }
}
