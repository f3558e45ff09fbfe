//! Edge routing between anchor points.
//!
//! Works in the top-to-bottom frame. Forward edges leave from the bottom
//! side and enter at the top side. Back-edges and self-loops attach to the
//! right side, which becomes the bottom side once a left-to-right layout is
//! transposed.

use std::cmp::Ordering;

use flowsketch_core::geometry::{Point, Size};

use crate::{
    layout::EdgeKind,
    structure::{EdgeIndex, FlowGraph},
};

/// Horizontal distance between the trailing side and a back-edge or loop.
const LOOP_OFFSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Source,
    Target,
}

/// Positions shared by every routing step.
pub(super) struct Frame<'a> {
    /// Node centers by node index.
    pub(super) centers: &'a [Point],
    /// Node sizes by node index.
    pub(super) sizes: &'a [Size],
    /// Virtual point centers per edge, from the upper end downwards.
    pub(super) chains: &'a [Vec<Point>],
}

impl Frame<'_> {
    fn left(&self, node: usize) -> f32 {
        self.centers[node].x() - self.sizes[node].width() / 2.0
    }

    fn right(&self, node: usize) -> f32 {
        self.centers[node].x() + self.sizes[node].width() / 2.0
    }

    fn top(&self, node: usize) -> f32 {
        self.centers[node].y() - self.sizes[node].height() / 2.0
    }

    fn bottom(&self, node: usize) -> f32 {
        self.centers[node].y() + self.sizes[node].height() / 2.0
    }
}

/// Returns the polyline of every edge, indexed by edge index.
pub(super) fn route(flow: &FlowGraph<'_>, kinds: &[EdgeKind], frame: &Frame<'_>) -> Vec<Vec<Point>> {
    let graph = flow.inner();
    let edge_count = graph.edges_count();
    let mut source_anchors = vec![Point::default(); edge_count];
    let mut target_anchors = vec![Point::default(); edge_count];

    for node in graph.node_indices() {
        let n = node.index();

        // Exit side: ordered by where the edge heads next.
        let exits = sorted_by_key(
            graph
                .outgoing(node)
                .iter()
                .filter(|edge| kinds[edge.index()] == EdgeKind::Forward)
                .map(|&edge| {
                    let next = frame.chains[edge.index()]
                        .first()
                        .copied()
                        .unwrap_or(frame.centers[graph.endpoints(edge).1.index()]);
                    (next.x(), edge)
                }),
        );
        for (slot, point) in spread(frame.left(n), frame.sizes[n].width(), exits.len())
            .into_iter()
            .enumerate()
        {
            source_anchors[exits[slot].index()] = Point::new(point, frame.bottom(n));
        }

        // Entry side: ordered by where the edge comes from.
        let entries = sorted_by_key(
            graph
                .incoming(node)
                .iter()
                .filter(|edge| kinds[edge.index()] == EdgeKind::Forward)
                .map(|&edge| {
                    let previous = frame.chains[edge.index()]
                        .last()
                        .copied()
                        .unwrap_or(frame.centers[graph.endpoints(edge).0.index()]);
                    (previous.x(), edge)
                }),
        );
        for (slot, point) in spread(frame.left(n), frame.sizes[n].width(), entries.len())
            .into_iter()
            .enumerate()
        {
            target_anchors[entries[slot].index()] = Point::new(point, frame.top(n));
        }
    }

    // Trailing side, in edge order. A self-loop takes two attachments.
    let mut trailing: Vec<Vec<(EdgeIndex, End)>> = vec![Vec::new(); graph.nodes_count()];
    for edge in graph.edge_indices() {
        let (source, target) = graph.endpoints(edge);
        match kinds[edge.index()] {
            EdgeKind::Forward => {}
            EdgeKind::Back | EdgeKind::SelfLoop => {
                trailing[source.index()].push((edge, End::Source));
                trailing[target.index()].push((edge, End::Target));
            }
        }
    }
    for (n, attachments) in trailing.iter().enumerate() {
        let ys = spread(frame.top(n), frame.sizes[n].height(), attachments.len());
        for (&(edge, end), y) in attachments.iter().zip(ys) {
            let anchor = Point::new(frame.right(n), y);
            match end {
                End::Source => source_anchors[edge.index()] = anchor,
                End::Target => target_anchors[edge.index()] = anchor,
            }
        }
    }

    graph
        .edge_indices()
        .map(|edge| {
            let start = source_anchors[edge.index()];
            let end = target_anchors[edge.index()];
            let chain = &frame.chains[edge.index()];
            match kinds[edge.index()] {
                EdgeKind::Forward => std::iter::once(start)
                    .chain(chain.iter().copied())
                    .chain(std::iter::once(end))
                    .collect(),
                EdgeKind::Back => {
                    let mut points = vec![start, start.with_x(start.x() + LOOP_OFFSET)];
                    points.extend(chain.iter().rev().copied());
                    points.push(end.with_x(end.x() + LOOP_OFFSET));
                    points.push(end);
                    points
                }
                EdgeKind::SelfLoop => vec![
                    start,
                    start.with_x(start.x() + LOOP_OFFSET),
                    end.with_x(end.x() + LOOP_OFFSET),
                    end,
                ],
            }
        })
        .collect()
}

fn sorted_by_key(items: impl Iterator<Item = (f32, EdgeIndex)>) -> Vec<EdgeIndex> {
    let mut items: Vec<_> = items.collect();
    items.sort_by(|a, b| match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    });
    items.into_iter().map(|(_, edge)| edge).collect()
}

/// Evenly spaced, distinct offsets along a side starting at `start`.
fn spread(start: f32, length: f32, count: usize) -> Vec<f32> {
    (1..=count)
        .map(|i| start + length * i as f32 / (count + 1) as f32)
        .collect()
}
