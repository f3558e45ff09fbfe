//! The layered layout engine and its builder.

use log::{debug, info};

use flowsketch_core::{
    geometry::{Point, Size},
    semantic::Graph,
};

use super::{
    Direction, EdgeKind, Layout, NodeSizes, PositionedNode, RoutedEdge, acyclic,
    layers::{LayerGraph, Slot},
    order,
    position::{self, Grid},
    rank,
    routing::{self, Frame},
};
use crate::structure::FlowGraph;

/// Layered layout engine for flowcharts.
///
/// The engine holds configuration only; [`Engine::calculate`] is pure and
/// yields identical output for identical input.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Flow direction of the ranks
    direction: Direction,

    /// Gap between neighbouring slots of a rank
    node_spacing: f32,

    /// Gap between consecutive ranks
    rank_spacing: f32,

    /// Gap between disconnected components
    component_spacing: f32,

    /// Upper bound on barycenter sweeps
    crossing_passes: usize,

    node_sizes: NodeSizes,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the default spacing and node sizes.
    pub fn new() -> Self {
        Self {
            direction: Direction::default(),
            node_spacing: 50.0,
            rank_spacing: 60.0,
            component_spacing: 50.0,
            crossing_passes: 24,
            node_sizes: NodeSizes::default(),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// Set the gap between neighbouring nodes of a rank.
    ///
    /// Negative and non-finite gaps are treated as zero, here and in the
    /// other spacing setters.
    pub fn set_node_spacing(&mut self, spacing: f32) -> &mut Self {
        self.node_spacing = gap(spacing);
        self
    }

    /// Set the gap between ranks
    pub fn set_rank_spacing(&mut self, spacing: f32) -> &mut Self {
        self.rank_spacing = gap(spacing);
        self
    }

    /// Set the gap between disconnected components
    pub fn set_component_spacing(&mut self, spacing: f32) -> &mut Self {
        self.component_spacing = gap(spacing);
        self
    }

    pub fn set_crossing_passes(&mut self, passes: usize) -> &mut Self {
        self.crossing_passes = passes;
        self
    }

    pub fn set_node_sizes(&mut self, sizes: NodeSizes) -> &mut Self {
        self.node_sizes = sizes;
        self
    }

    /// Lays out `graph`.
    ///
    /// An empty graph yields an empty layout of size 0×0.
    pub fn calculate(&self, graph: &Graph) -> Layout {
        let flow = FlowGraph::new(graph);
        let inner = flow.inner();
        if inner.nodes_count() == 0 {
            return Layout::empty(self.direction);
        }

        let kinds = acyclic::classify(&flow);
        let ranks = rank::longest_path(&flow, &kinds);
        debug!(
            back_edges = kinds.iter().filter(|kind| **kind == EdgeKind::Back).count(),
            self_loops = kinds.iter().filter(|kind| **kind == EdgeKind::SelfLoop).count();
            "Edges classified"
        );

        // Node sizes in the top-to-bottom frame.
        let sizes: Vec<Size> = inner
            .node_indices()
            .map(|node| self.frame_size(self.node_sizes.get(flow.node(node).kind())))
            .collect();
        let extent = sizes.iter().fold(Size::default(), |acc, size| acc.max(*size));
        let grid = Grid::new(extent, self.node_spacing, self.rank_spacing);

        let mut centers = vec![Point::default(); inner.nodes_count()];
        let mut orders = vec![0usize; inner.nodes_count()];
        let mut chains: Vec<Vec<Point>> = vec![Vec::new(); inner.edges_count()];
        let mut component_ranks = Vec::new();
        let mut origin_x = 0.0;

        for component in flow.components() {
            let mut layer_graph = LayerGraph::build(&flow, &component, &ranks, &kinds);
            let crossings = order::minimize_crossings(&mut layer_graph, self.crossing_passes);
            let placement = position::place(&layer_graph, &grid, origin_x);
            debug!(
                nodes = component.len(),
                ranks = layer_graph.depth(),
                crossings = crossings;
                "Component laid out"
            );

            for layer in layer_graph.layers() {
                let mut real = 0;
                for &slot in layer {
                    if let Slot::Node(node) = layer_graph.slot(slot) {
                        centers[node.index()] = placement.center(slot);
                        orders[node.index()] = real;
                        real += 1;
                    }
                }
            }
            for (edge, virtuals) in layer_graph.chains() {
                chains[edge.index()] = virtuals
                    .iter()
                    .map(|&slot| placement.center(slot))
                    .collect();
            }

            component_ranks.push(layer_graph.depth());
            origin_x += placement.size().width() + self.component_spacing;
        }

        let frame = Frame {
            centers: &centers,
            sizes: &sizes,
            chains: &chains,
        };
        let routes = routing::route(&flow, &kinds, &frame);

        let nodes: Vec<PositionedNode> = inner
            .node_indices()
            .map(|node| {
                let data = flow.node(node);
                let size = self.node_sizes.get(data.kind());
                let center = self.frame_point(centers[node.index()]);
                let top_left = Point::new(
                    center.x() - size.width() / 2.0,
                    center.y() - size.height() / 2.0,
                );
                PositionedNode::new(
                    data,
                    ranks[node.index()],
                    orders[node.index()],
                    top_left,
                    size,
                )
            })
            .collect();

        let edges: Vec<RoutedEdge> = inner
            .edge_indices()
            .zip(routes)
            .map(|(edge, points)| {
                let points = points.into_iter().map(|p| self.frame_point(p)).collect();
                RoutedEdge::new(flow.edge(edge), kinds[edge.index()], points)
            })
            .collect();

        let (width, height) = extent_of(&nodes, &edges);
        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            components = component_ranks.len(),
            width = width,
            height = height;
            "Layout calculated"
        );

        Layout {
            direction: self.direction,
            width,
            height,
            ranks: component_ranks,
            nodes,
            edges,
        }
    }

    fn frame_size(&self, size: Size) -> Size {
        if self.direction.is_horizontal() {
            size.transpose()
        } else {
            size
        }
    }

    fn frame_point(&self, point: Point) -> Point {
        if self.direction.is_horizontal() {
            point.transpose()
        } else {
            point
        }
    }
}

fn gap(spacing: f32) -> f32 {
    if spacing.is_finite() {
        spacing.max(0.0)
    } else {
        0.0
    }
}

/// Bottom-right corner of everything drawn.
fn extent_of(nodes: &[PositionedNode], edges: &[RoutedEdge]) -> (f32, f32) {
    let node_corners = nodes.iter().map(|node| {
        let bounds = node.bounds();
        (bounds.max_x(), bounds.max_y())
    });
    let edge_points = edges
        .iter()
        .flat_map(|edge| edge.points().iter().map(|p| (p.x(), p.y())));

    node_corners
        .chain(edge_points)
        .fold((0.0_f32, 0.0_f32), |(w, h), (x, y)| (w.max(x), h.max(y)))
}

/// Builder for configuring an [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    engine: Engine,
}

impl EngineBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.engine.set_direction(direction);
        self
    }

    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.engine.set_node_spacing(spacing);
        self
    }

    pub fn with_rank_spacing(mut self, spacing: f32) -> Self {
        self.engine.set_rank_spacing(spacing);
        self
    }

    pub fn with_component_spacing(mut self, spacing: f32) -> Self {
        self.engine.set_component_spacing(spacing);
        self
    }

    /// Set the maximum number of barycenter sweeps
    pub fn with_crossing_passes(mut self, passes: usize) -> Self {
        self.engine.set_crossing_passes(passes);
        self
    }

    pub fn with_node_sizes(mut self, sizes: NodeSizes) -> Self {
        self.engine.set_node_sizes(sizes);
        self
    }

    pub fn build(self) -> Engine {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use flowsketch_core::{
        identifier::Id,
        semantic::{Edge, Node, NodeKind},
    };

    use super::*;

    fn graph(nodes: &[(&str, NodeKind)], edges: &[(&str, &str, Option<&str>)]) -> Graph {
        let nodes = nodes
            .iter()
            .map(|(id, kind)| Node::new(Id::new(id), *kind, *id))
            .collect();
        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t, label))| {
                let edge = Edge::new(Id::new(&format!("e{i}")), Id::new(s), Id::new(t));
                match label {
                    Some(label) => edge.with_label(*label),
                    None => edge,
                }
            })
            .collect();
        Graph::new(nodes, edges).unwrap()
    }

    #[test]
    fn test_empty_graph() {
        let layout = Engine::new().calculate(&Graph::default());

        assert!(layout.is_empty());
        assert!(layout.size().is_zero());
    }

    #[test]
    fn test_single_node_at_origin() {
        let layout = Engine::new().calculate(&graph(&[("a", NodeKind::Start)], &[]));

        let node = layout.node("a").unwrap();
        assert_eq!(node.rank(), 0);
        assert_approx_eq!(f32, node.position().x(), 0.0);
        assert_approx_eq!(f32, node.position().y(), 0.0);
        assert_eq!(layout.size(), Size::new(140.0, 50.0));
    }

    #[test]
    fn test_chain_ranks_and_positions() {
        let layout = Engine::new().calculate(&graph(
            &[
                ("s", NodeKind::Start),
                ("p", NodeKind::Process),
                ("e", NodeKind::End),
            ],
            &[("s", "p", None), ("p", "e", None)],
        ));

        let ys: Vec<f32> = layout.nodes().iter().map(|n| n.position().y()).collect();
        assert_eq!(ys, vec![0.0, 110.0, 220.0]);
        assert_eq!(layout.ranks(), &[3]);

        let edge = layout.edge("e0").unwrap();
        assert_eq!(edge.kind(), EdgeKind::Forward);
        assert_approx_eq!(f32, edge.source_anchor().y(), 50.0);
        assert_approx_eq!(f32, edge.target_anchor().y(), 110.0);
        assert_approx_eq!(f32, edge.source_anchor().x(), 70.0);
    }

    #[test]
    fn test_decision_branches_attach_at_distinct_points() {
        let layout = Engine::new().calculate(&graph(
            &[
                ("q", NodeKind::Decision),
                ("yes", NodeKind::Process),
                ("no", NodeKind::Process),
            ],
            &[("q", "yes", Some("Yes")), ("q", "no", Some("No"))],
        ));

        let yes = layout.edge("e0").unwrap();
        let no = layout.edge("e1").unwrap();
        assert!(yes.source_anchor().x() < no.source_anchor().x());
        assert!(yes.label_position().is_some());

        let rank_one: Vec<_> = layout.nodes().iter().filter(|n| n.rank() == 1).collect();
        assert_eq!(rank_one.len(), 2);
        assert!(rank_one[0].position().x() != rank_one[1].position().x());
    }

    #[test]
    fn test_back_edge_runs_on_right_side() {
        let layout = Engine::new().calculate(&graph(
            &[("a", NodeKind::Process), ("b", NodeKind::Process)],
            &[("a", "b", None), ("b", "a", Some("retry"))],
        ));

        let back = layout.edge("e1").unwrap();
        assert_eq!(back.kind(), EdgeKind::Back);
        assert_approx_eq!(f32, back.source_anchor().x(), 140.0);
        assert_approx_eq!(f32, back.target_anchor().x(), 140.0);
        assert!(back.points().iter().any(|p| p.x() > 140.0));
        assert!(layout.size().width() > 140.0);
    }

    #[test]
    fn test_self_loop() {
        let layout = Engine::new().calculate(&graph(
            &[("a", NodeKind::Process)],
            &[("a", "a", None)],
        ));

        let edge = layout.edge("e0").unwrap();
        assert_eq!(edge.kind(), EdgeKind::SelfLoop);
        assert_eq!(edge.points().len(), 4);
        assert!(edge.source_anchor().y() < edge.target_anchor().y());
    }

    #[test]
    fn test_components_side_by_side() {
        let layout = Engine::new().calculate(&graph(
            &[("a", NodeKind::Process), ("b", NodeKind::Process)],
            &[],
        ));

        let a = layout.node("a").unwrap();
        let b = layout.node("b").unwrap();
        assert_eq!(a.rank(), 0);
        assert_eq!(b.rank(), 0);
        assert_approx_eq!(f32, b.position().x(), 190.0);
        assert_eq!(layout.ranks(), &[1, 1]);
    }

    #[test]
    fn test_left_to_right_transposes() {
        let graph = graph(
            &[("a", NodeKind::Process), ("b", NodeKind::Process)],
            &[("a", "b", None)],
        );
        let layout = EngineBuilder::new()
            .with_direction(Direction::LeftToRight)
            .build()
            .calculate(&graph);

        let b = layout.node("b").unwrap();
        assert_eq!(b.size(), Size::new(140.0, 50.0));
        assert_approx_eq!(f32, b.position().x(), 200.0);
        assert_approx_eq!(f32, b.position().y(), 0.0);
        assert_eq!(layout.direction(), Direction::LeftToRight);
    }

    #[test]
    fn test_builder_spacing() {
        let graph = graph(
            &[("a", NodeKind::Process), ("b", NodeKind::Process)],
            &[("a", "b", None)],
        );
        let layout = EngineBuilder::new()
            .with_rank_spacing(100.0)
            .with_node_sizes(NodeSizes::uniform(Size::new(100.0, 40.0)))
            .build()
            .calculate(&graph);

        assert_approx_eq!(f32, layout.node("b").unwrap().position().y(), 140.0);
    }

    #[test]
    fn test_negative_spacing_is_clamped() {
        let graph = graph(
            &[
                ("q", NodeKind::Decision),
                ("yes", NodeKind::Process),
                ("no", NodeKind::Process),
                ("lonely", NodeKind::End),
            ],
            &[("q", "yes", None), ("q", "no", None)],
        );
        let layout = EngineBuilder::new()
            .with_node_spacing(-200.0)
            .with_rank_spacing(f32::NAN)
            .with_component_spacing(-50.0)
            .build()
            .calculate(&graph);

        let nodes = layout.nodes();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                assert!(!a.bounds().intersects(&b.bounds()), "{} overlaps {}", a.id(), b.id());
            }
        }
        assert_approx_eq!(f32, layout.node("yes").unwrap().position().y(), 50.0);
        assert_approx_eq!(f32, layout.node("no").unwrap().position().x(), 140.0);
    }
}
