//! Proper layering of one component.
//!
//! Every ranked edge is turned into a chain of segments joining adjacent
//! ranks by inserting virtual slots. Back-edges are chained from their target
//! (upper end) down to their source.

use crate::{
    layout::EdgeKind,
    structure::{EdgeIndex, FlowGraph, NodeIndex},
};

/// A vertex of the layer graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Slot {
    /// A real flowchart node.
    Node(NodeIndex),
    /// A virtual point on a long edge.
    Virtual(EdgeIndex),
}

/// Ranks of a single component with slots in their current order.
#[derive(Debug, Clone)]
pub(super) struct LayerGraph {
    slots: Vec<Slot>,
    layers: Vec<Vec<usize>>,
    up: Vec<Vec<usize>>,
    down: Vec<Vec<usize>>,
    chains: Vec<(EdgeIndex, Vec<usize>)>,
}

impl LayerGraph {
    /// Builds the layer graph for the nodes of one component.
    ///
    /// `component` lists nodes in insertion order. Ranks are global, but the
    /// ranks of a component always start at 0.
    pub(super) fn build(
        flow: &FlowGraph<'_>,
        component: &[NodeIndex],
        ranks: &[usize],
        kinds: &[EdgeKind],
    ) -> Self {
        let graph = flow.inner();
        let depth = component
            .iter()
            .map(|node| ranks[node.index()] + 1)
            .max()
            .unwrap_or(0);

        let mut layer_graph = Self {
            slots: Vec::new(),
            layers: vec![Vec::new(); depth],
            up: Vec::new(),
            down: Vec::new(),
            chains: Vec::new(),
        };

        let mut slot_of: Vec<Option<usize>> = vec![None; graph.nodes_count()];
        // (top node, virtual slots, bottom node) per ranked edge
        let mut pending: Vec<(NodeIndex, Vec<usize>, NodeIndex)> = Vec::new();

        for &node in component {
            let rank = ranks[node.index()];
            slot_of[node.index()] = Some(layer_graph.push_slot(Slot::Node(node), rank));

            // Edges whose upper end is this node, in insertion order.
            let mut started: Vec<(EdgeIndex, NodeIndex)> = graph
                .outgoing(node)
                .iter()
                .filter(|edge| kinds[edge.index()] == EdgeKind::Forward)
                .map(|&edge| (edge, graph.endpoints(edge).1))
                .chain(
                    graph
                        .incoming(node)
                        .iter()
                        .filter(|edge| kinds[edge.index()] == EdgeKind::Back)
                        .map(|&edge| (edge, graph.endpoints(edge).0)),
                )
                .collect();
            started.sort_by_key(|(edge, _)| *edge);

            for (edge, bottom) in started {
                let bottom_rank = ranks[bottom.index()];
                let virtuals = (rank + 1..bottom_rank)
                    .map(|r| layer_graph.push_slot(Slot::Virtual(edge), r))
                    .collect::<Vec<_>>();
                if !virtuals.is_empty() {
                    layer_graph.chains.push((edge, virtuals.clone()));
                }
                pending.push((node, virtuals, bottom));
            }
        }

        for (top, virtuals, bottom) in pending {
            let (Some(top), Some(bottom)) = (slot_of[top.index()], slot_of[bottom.index()]) else {
                continue;
            };
            let chain: Vec<usize> = std::iter::once(top)
                .chain(virtuals)
                .chain(std::iter::once(bottom))
                .collect();
            for pair in chain.windows(2) {
                layer_graph.down[pair[0]].push(pair[1]);
                layer_graph.up[pair[1]].push(pair[0]);
            }
        }

        layer_graph
    }

    fn push_slot(&mut self, slot: Slot, rank: usize) -> usize {
        let id = self.slots.len();
        self.slots.push(slot);
        self.up.push(Vec::new());
        self.down.push(Vec::new());
        self.layers[rank].push(id);
        id
    }

    pub(super) fn slot(&self, id: usize) -> Slot {
        self.slots[id]
    }

    pub(super) fn slots_count(&self) -> usize {
        self.slots.len()
    }

    pub(super) fn depth(&self) -> usize {
        self.layers.len()
    }

    pub(super) fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    pub(super) fn set_layers(&mut self, layers: Vec<Vec<usize>>) {
        self.layers = layers;
    }

    pub(super) fn layer_mut(&mut self, rank: usize) -> &mut Vec<usize> {
        &mut self.layers[rank]
    }

    /// Neighbours of `id` in the rank above.
    pub(super) fn up(&self, id: usize) -> &[usize] {
        &self.up[id]
    }

    /// Neighbours of `id` in the rank below.
    pub(super) fn down(&self, id: usize) -> &[usize] {
        &self.down[id]
    }

    /// Virtual slots of every long edge, from the upper end downwards.
    pub(super) fn chains(&self) -> &[(EdgeIndex, Vec<usize>)] {
        &self.chains
    }

    /// Index of every slot within its layer.
    pub(super) fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.slots.len()];
        for layer in &self.layers {
            for (position, &id) in layer.iter().enumerate() {
                positions[id] = position;
            }
        }
        positions
    }
}
