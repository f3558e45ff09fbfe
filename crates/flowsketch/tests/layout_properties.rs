//! Property tests for the layered layout.

use proptest::prelude::*;

use flowsketch::{
    identifier::Id,
    layout::{EdgeKind, Engine},
    semantic::{Edge, Graph, Node, NodeKind},
};

/// Random graphs of up to 12 nodes, cycles and self-loops included.
fn arb_graph() -> impl Strategy<Value = Graph> {
    (1usize..12).prop_flat_map(|node_count| {
        let kinds = prop::collection::vec(0usize..4, node_count);
        let edges = prop::collection::vec((0..node_count, 0..node_count), 0..20);
        (kinds, edges).prop_map(|(kinds, edges)| {
            let nodes = kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| {
                    Node::new(Id::new(&format!("n{i}")), NodeKind::ALL[*kind], format!("Step {i}"))
                })
                .collect();
            let edges = edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| {
                    Edge::new(
                        Id::new(&format!("e{i}")),
                        Id::new(&format!("n{s}")),
                        Id::new(&format!("n{t}")),
                    )
                })
                .collect();
            Graph::new(nodes, edges).expect("generated graph is valid")
        })
    })
}

proptest! {
    #[test]
    fn layout_is_deterministic(graph in arb_graph()) {
        let engine = Engine::new();
        prop_assert_eq!(engine.calculate(&graph), engine.calculate(&graph));
    }

    #[test]
    fn forward_edges_increase_rank(graph in arb_graph()) {
        let layout = Engine::new().calculate(&graph);

        for edge in layout.edges() {
            let source = layout.node(edge.source()).unwrap();
            let target = layout.node(edge.target()).unwrap();
            match edge.kind() {
                EdgeKind::Forward => prop_assert!(target.rank() > source.rank()),
                EdgeKind::Back => prop_assert!(target.rank() < source.rank()),
                EdgeKind::SelfLoop => prop_assert_eq!(edge.source(), edge.target()),
            }
        }
    }

    #[test]
    fn nodes_never_overlap(graph in arb_graph()) {
        let layout = Engine::new().calculate(&graph);
        let nodes = layout.nodes();

        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                prop_assert!(
                    !a.bounds().intersects(&b.bounds()),
                    "{} and {} overlap", a.id(), b.id()
                );
            }
        }
    }

    #[test]
    fn every_edge_is_routed_inside_the_layout(graph in arb_graph()) {
        let layout = Engine::new().calculate(&graph);
        let size = layout.size();

        prop_assert_eq!(layout.edges().len(), graph.edges_count());
        for edge in layout.edges() {
            prop_assert!(edge.points().len() >= 2);
            for point in edge.points() {
                prop_assert!(point.x() >= 0.0 && point.x() <= size.width());
                prop_assert!(point.y() >= 0.0 && point.y() <= size.height());
            }
        }
    }
}
