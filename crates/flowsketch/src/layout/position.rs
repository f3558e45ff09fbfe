//! Coordinate assignment on a uniform slot grid.
//!
//! All coordinates here are in the top-to-bottom frame: the order axis is
//! x and the rank axis is y.

use flowsketch_core::geometry::{Point, Size};

use super::layers::LayerGraph;

/// Spacing of the slot grid shared by every component.
#[derive(Debug, Clone, Copy)]
pub(super) struct Grid {
    extent: Size,
    node_spacing: f32,
    rank_spacing: f32,
}

impl Grid {
    /// `extent` is the largest node size in the frame.
    pub(super) fn new(extent: Size, node_spacing: f32, rank_spacing: f32) -> Self {
        Self {
            extent,
            node_spacing,
            rank_spacing,
        }
    }

    fn slot_pitch(&self) -> f32 {
        self.extent.width() + self.node_spacing
    }

    fn rank_pitch(&self) -> f32 {
        self.extent.height() + self.rank_spacing
    }

    /// Width taken by `slots` slots side by side.
    fn span(&self, slots: usize) -> f32 {
        if slots == 0 {
            return 0.0;
        }
        slots as f32 * self.slot_pitch() - self.node_spacing
    }
}

/// Slot centers of one component.
#[derive(Debug, Clone)]
pub(super) struct Placement {
    centers: Vec<Point>,
    size: Size,
}

impl Placement {
    pub(super) fn center(&self, slot: usize) -> Point {
        self.centers[slot]
    }

    /// Extent of the component's grid.
    pub(super) fn size(&self) -> Size {
        self.size
    }
}

/// Places every slot at the centre of its grid cell.
///
/// Each rank is centred within the widest rank of the component, and the
/// component's left edge is at `origin_x`.
pub(super) fn place(layer_graph: &LayerGraph, grid: &Grid, origin_x: f32) -> Placement {
    let widest = layer_graph
        .layers()
        .iter()
        .map(|layer| grid.span(layer.len()))
        .fold(0.0_f32, f32::max);

    let mut centers = vec![Point::default(); layer_graph.slots_count()];
    for (rank, layer) in layer_graph.layers().iter().enumerate() {
        let offset = (widest - grid.span(layer.len())) / 2.0;
        let y = rank as f32 * grid.rank_pitch() + grid.extent.height() / 2.0;
        for (index, &slot) in layer.iter().enumerate() {
            let x = origin_x + offset + index as f32 * grid.slot_pitch() + grid.extent.width() / 2.0;
            centers[slot] = Point::new(x, y);
        }
    }

    let depth = layer_graph.depth();
    let height = if depth == 0 {
        0.0
    } else {
        depth as f32 * grid.rank_pitch() - grid.rank_spacing
    };

    Placement {
        centers,
        size: Size::new(widest, height),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use flowsketch_core::{
        identifier::Id,
        semantic::{Edge, Graph, Node, NodeKind},
    };

    use super::*;
    use crate::{
        layout::{acyclic, rank},
        structure::FlowGraph,
    };

    fn placed(nodes: &[&str], edges: &[(&str, &str)], origin_x: f32) -> Placement {
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
        let ranks = rank::longest_path(&flow, &kinds);
        let component: Vec<_> = flow.inner().node_indices().collect();
        let layers = LayerGraph::build(&flow, &component, &ranks, &kinds);
        let grid = Grid::new(Size::new(140.0, 50.0), 50.0, 60.0);
        place(&layers, &grid, origin_x)
    }

    #[test]
    fn test_single_slot_at_origin() {
        let placement = placed(&["a"], &[], 0.0);

        assert_approx_eq!(f32, placement.center(0).x(), 70.0);
        assert_approx_eq!(f32, placement.center(0).y(), 25.0);
        assert_eq!(placement.size(), Size::new(140.0, 50.0));
    }

    #[test]
    fn test_chain_is_stacked_with_rank_pitch() {
        let placement = placed(&["a", "b"], &[("a", "b")], 0.0);

        assert_approx_eq!(f32, placement.center(1).x(), 70.0);
        assert_approx_eq!(f32, placement.center(1).y(), 25.0 + 110.0);
        assert_approx_eq!(f32, placement.size().height(), 160.0);
    }

    #[test]
    fn test_narrow_rank_is_centred() {
        // a fans out to b and c.
        let placement = placed(&["a", "b", "c"], &[("a", "b"), ("a", "c")], 10.0);

        // Two slots span 140 + 50 + 140.
        assert_approx_eq!(f32, placement.size().width(), 330.0);
        assert_approx_eq!(f32, placement.center(0).x(), 10.0 + 165.0);
        assert_approx_eq!(f32, placement.center(1).x(), 10.0 + 70.0);
        assert_approx_eq!(f32, placement.center(2).x(), 10.0 + 260.0);
    }
}
