//! Graph structure used by the layout engine.
//!
//! [`FlowGraph`] borrows a validated [`semantic::Graph`] and indexes it for
//! traversal: dense node and edge indices in insertion order plus incoming
//! and outgoing adjacency per node.

use log::{debug, warn};

use flowsketch_core::semantic;

mod graph_base;

pub(crate) use graph_base::{EdgeIndex, GraphInternal, NodeIndex};

/// Indexed view of a flowchart graph.
#[derive(Debug)]
pub(crate) struct FlowGraph<'a> {
    graph: GraphInternal<&'a semantic::Node, &'a semantic::Edge>,
}

impl<'a> FlowGraph<'a> {
    /// Indexes `graph`.
    pub(crate) fn new(graph: &'a semantic::Graph) -> Self {
        let mut internal = GraphInternal::new();
        for node in graph.nodes() {
            internal.add_node(node.id(), node);
        }

        for edge in graph.edges() {
            let (Some(source), Some(target)) = (
                internal.node_index(edge.source()),
                internal.node_index(edge.target()),
            ) else {
                // A validated graph never gets here.
                warn!(edge:% = edge; "Skipping edge with unknown endpoint");
                continue;
            };
            internal.add_edge(source, target, edge);
        }

        debug!(
            nodes = internal.nodes_count(),
            edges = internal.edges_count();
            "Flow graph indexed"
        );
        Self { graph: internal }
    }

    pub(crate) fn inner(&self) -> &GraphInternal<&'a semantic::Node, &'a semantic::Edge> {
        &self.graph
    }

    pub(crate) fn node(&self, index: NodeIndex) -> &'a semantic::Node {
        self.graph.node(index)
    }

    pub(crate) fn edge(&self, index: EdgeIndex) -> &'a semantic::Edge {
        self.graph.edge(index)
    }

    /// Splits the nodes into weakly connected components.
    ///
    /// Components are ordered by their first node and list their nodes in
    /// insertion order.
    pub(crate) fn components(&self) -> Vec<Vec<NodeIndex>> {
        let mut component_of: Vec<Option<usize>> = vec![None; self.graph.nodes_count()];
        let mut components: Vec<Vec<NodeIndex>> = Vec::new();

        for start in self.graph.node_indices() {
            if component_of[start.index()].is_some() {
                continue;
            }
            let id = components.len();
            let mut members = vec![start];
            component_of[start.index()] = Some(id);

            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                for neighbor in self.graph.neighbors(node) {
                    if component_of[neighbor.index()].is_none() {
                        component_of[neighbor.index()] = Some(id);
                        members.push(neighbor);
                        stack.push(neighbor);
                    }
                }
            }

            members.sort();
            components.push(members);
        }

        components
    }
}
