//! Crossing reduction by barycenter sweeps.

use log::trace;

use super::layers::LayerGraph;

/// Reorders the layers of `layer_graph` to reduce edge crossings.
///
/// Runs up to `max_passes` sweeps, alternating downward (ordering by
/// predecessor positions) and upward (ordering by successor positions).
/// The ordering with the fewest crossings is kept and iteration stops at the
/// first sweep that does not improve on it. Returns the remaining number of
/// crossings.
pub(super) fn minimize_crossings(layer_graph: &mut LayerGraph, max_passes: usize) -> usize {
    let mut best = layer_graph.layers().to_vec();
    let mut best_crossings = count_crossings(layer_graph);

    for pass in 0..max_passes {
        if best_crossings == 0 {
            break;
        }

        sweep(layer_graph, pass % 2 == 0);
        let crossings = count_crossings(layer_graph);
        trace!(pass = pass, crossings = crossings; "Barycenter sweep");

        if crossings < best_crossings {
            best = layer_graph.layers().to_vec();
            best_crossings = crossings;
        } else {
            break;
        }
    }

    layer_graph.set_layers(best);
    best_crossings
}

fn sweep(layer_graph: &mut LayerGraph, downward: bool) {
    let depth = layer_graph.depth();
    if depth < 2 {
        return;
    }
    let mut positions = layer_graph.positions();

    let ranks: Vec<usize> = if downward {
        (1..depth).collect()
    } else {
        (0..depth - 1).rev().collect()
    };

    for rank in ranks {
        let mut keyed: Vec<(f32, usize)> = layer_graph.layers()[rank]
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let fixed = if downward {
                    layer_graph.up(id)
                } else {
                    layer_graph.down(id)
                };
                (barycenter(fixed, &positions).unwrap_or(index as f32), id)
            })
            .collect();

        // Stable, so ties keep the previous order.
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let layer = layer_graph.layer_mut(rank);
        *layer = keyed.into_iter().map(|(_, id)| id).collect();
        for (position, &id) in layer.iter().enumerate() {
            positions[id] = position;
        }
    }
}

fn barycenter(neighbors: &[usize], positions: &[usize]) -> Option<f32> {
    if neighbors.is_empty() {
        return None;
    }
    let sum: usize = neighbors.iter().map(|&id| positions[id]).sum();
    Some(sum as f32 / neighbors.len() as f32)
}

/// Counts pairwise crossings between segments of adjacent layers.
pub(super) fn count_crossings(layer_graph: &LayerGraph) -> usize {
    let positions = layer_graph.positions();
    let mut crossings = 0;

    for layer in layer_graph.layers() {
        let segments: Vec<(usize, usize)> = layer
            .iter()
            .flat_map(|&id| {
                layer_graph
                    .down(id)
                    .iter()
                    .map(move |&below| (id, below))
            })
            .map(|(upper, lower)| (positions[upper], positions[lower]))
            .collect();

        for (i, &(a1, b1)) in segments.iter().enumerate() {
            for &(a2, b2) in &segments[i + 1..] {
                if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                    crossings += 1;
                }
            }
        }
    }

    crossings
}
