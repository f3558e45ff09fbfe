//! Back-edge classification.
//!
//! A depth-first search marks every edge that closes a cycle, so that the
//! remaining edges form a DAG that can be ranked.

use crate::{
    layout::EdgeKind,
    structure::{FlowGraph, NodeIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Classifies every edge of `flow`, indexed by edge index.
///
/// The search starts from the roots in insertion order, then from any node
/// still unvisited (nodes that are only reachable through a cycle). Edges
/// are followed in insertion order. An edge into a node on the current
/// search path is a back-edge.
pub(super) fn classify(flow: &FlowGraph<'_>) -> Vec<EdgeKind> {
    let graph = flow.inner();
    let mut kinds = vec![EdgeKind::Forward; graph.edges_count()];
    let mut state = vec![Visit::New; graph.nodes_count()];

    let starts: Vec<NodeIndex> = graph.roots().chain(graph.node_indices()).collect();
    for start in starts {
        if state[start.index()] != Visit::New {
            continue;
        }

        state[start.index()] = Visit::OnStack;
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];

        while let Some(&(node, next)) = stack.last() {
            let Some(&edge) = graph.outgoing(node).get(next) else {
                state[node.index()] = Visit::Done;
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let target = graph.endpoints(edge).1;
            if target == node {
                kinds[edge.index()] = EdgeKind::SelfLoop;
                continue;
            }
            match state[target.index()] {
                Visit::OnStack => kinds[edge.index()] = EdgeKind::Back,
                Visit::New => {
                    state[target.index()] = Visit::OnStack;
                    stack.push((target, 0));
                }
                Visit::Done => {}
            }
        }
    }

    kinds
}
