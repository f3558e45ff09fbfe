//! Longest-path ranking.

use std::collections::VecDeque;

use crate::{layout::EdgeKind, structure::FlowGraph};

/// Assigns every node the length of the longest forward path reaching it.
///
/// Only [`EdgeKind::Forward`] edges constrain ranks, so for each of them
/// `rank(target) > rank(source)`. Nodes without a ranking predecessor get
/// rank 0.
pub(super) fn longest_path(flow: &FlowGraph<'_>, kinds: &[EdgeKind]) -> Vec<usize> {
    let graph = flow.inner();
    let is_ranking = |edge: usize| kinds[edge] == EdgeKind::Forward;

    let mut indegree = vec![0usize; graph.nodes_count()];
    for edge in graph.edge_indices().filter(|edge| is_ranking(edge.index())) {
        indegree[graph.endpoints(edge).1.index()] += 1;
    }

    let mut queue: VecDeque<_> = graph
        .node_indices()
        .filter(|node| indegree[node.index()] == 0)
        .collect();
    let mut ranks = vec![0usize; graph.nodes_count()];

    while let Some(node) = queue.pop_front() {
        for &edge in graph.outgoing(node) {
            if !is_ranking(edge.index()) {
                continue;
            }
            let target = graph.endpoints(edge).1.index();
            ranks[target] = ranks[target].max(ranks[node.index()] + 1);
            indegree[target] -= 1;
            if indegree[target] == 0 {
                queue.push_back(graph.endpoints(edge).1);
            }
        }
    }

    ranks
}

#[cfg(test)]
mod tests {
    use flowsketch_core::{
        identifier::Id,
        semantic::{Edge, Graph, Node, NodeKind},
    };

    use super::*;
    use crate::layout::acyclic;

    fn ranks(nodes: &[&str], edges: &[(&str, &str)]) -> Vec<usize> {
        let nodes = nodes
            .iter()
            .map(|id| Node::new(Id::new(id), NodeKind::Process, *id))
            .collect();
        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| Edge::new(Id::new(&format!("e{i}")), Id::new(s), Id::new(t)))
            .collect();
        let graph = Graph::new(nodes, edges).unwrap();
        let flow = FlowGraph::new(&graph);
        let kinds = acyclic::classify(&flow);
        longest_path(&flow, &kinds)
    }

    #[test]
    fn test_chain() {
        assert_eq!(ranks(&["a", "b", "c"], &[("a", "b"), ("b", "c")]), vec![0, 1, 2]);
    }

    #[test]
    fn test_longest_path_wins() {
        // a -> d directly and through b -> c
        let result = ranks(
            &["a", "b", "c", "d"],
            &[("a", "d"), ("a", "b"), ("b", "c"), ("c", "d")],
        );
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_back_edge_does_not_rank() {
        let result = ranks(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert_eq!(result, vec![0, 1, 2]);
    }

    #[test]
    fn test_self_loop_does_not_rank() {
        assert_eq!(ranks(&["a"], &[("a", "a")]), vec![0]);
    }

    #[test]
    fn test_isolated_nodes_rank_zero() {
        assert_eq!(ranks(&["a", "b"], &[]), vec![0, 0]);
    }
}
