use std::collections::BTreeMap;

use crate::{foundation::math::unit_clamp, layout::engine::Layout};

/// Fraction of the draw-in over which a node fades in before its reveal point.
const NODE_FADE: f64 = 0.04;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Draw window of one edge, as fractions of the draw-in duration.
pub struct EdgeTiming {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Fraction at which the edge starts drawing.
    pub start: f64,
    /// Fraction at which the edge is fully drawn.
    pub end: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Synchronised reveal schedule for the draw-in animation.
///
/// Edges are grouped by the rank of their source layer among the layers that hold nodes, and
/// every rank gets an equal slot. All edges leaving an earlier layer therefore finish no later
/// than any edge leaving a later layer starts. A node appears when the first of its incoming
/// edges completes; the origin is visible from the start.
pub struct RevealTiming {
    /// Per-edge windows, parallel to [`Layout::edges`].
    pub edges: Vec<EdgeTiming>,
    /// Appearance fraction per node id.
    pub nodes: BTreeMap<String, f64>,
}

impl RevealTiming {
    /// Schedule every routed edge and node of `layout`.
    pub fn compute(layout: &Layout) -> Self {
        let graph = layout.graph();
        let present = graph.layer_values();
        let steps = present.len().saturating_sub(1);
        let rank_of = |layer: u32| present.binary_search(&layer).unwrap_or(0);

        let window = |layer: u32| -> (f64, f64) {
            if steps == 0 {
                return (0.0, 1.0);
            }
            let r = rank_of(layer).min(steps - 1) as f64;
            (r / steps as f64, (r + 1.0) / steps as f64)
        };

        let edges = layout
            .edges
            .iter()
            .map(|e| {
                let layer = graph.node(&e.from).map_or(0, |n| n.layer);
                let (start, end) = window(layer);
                EdgeTiming {
                    from: e.from.clone(),
                    to: e.to.clone(),
                    start,
                    end,
                }
            })
            .collect::<Vec<_>>();

        let origin = graph.origin_index();
        let nodes = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let appear = if Some(i) == origin {
                    0.0
                } else {
                    edges
                        .iter()
                        .filter(|e| e.to == n.id)
                        .map(|e| e.end)
                        .reduce(f64::min)
                        .unwrap_or_else(|| {
                            if steps == 0 {
                                0.0
                            } else {
                                rank_of(n.layer) as f64 / steps as f64
                            }
                        })
                };
                (n.id.clone(), appear)
            })
            .collect();

        Self { edges, nodes }
    }

    /// Drawn fraction of edge `i` at draw-in fraction `t`.
    pub fn edge_progress(&self, i: usize, t: f64) -> f64 {
        let Some(e) = self.edges.get(i) else {
            return 0.0;
        };
        let span = e.end - e.start;
        if span <= 0.0 {
            return if t >= e.end { 1.0 } else { 0.0 };
        }
        unit_clamp((t - e.start) / span)
    }

    /// Appearance fraction of node `id`, if it is laid out.
    pub fn node_appear(&self, id: &str) -> Option<f64> {
        self.nodes.get(id).copied()
    }

    /// Node opacity at draw-in fraction `t`; reaches 1 exactly at the appearance fraction.
    pub fn node_opacity(&self, id: &str, t: f64) -> f64 {
        let Some(appear) = self.node_appear(id) else {
            return 0.0;
        };
        unit_clamp((t - (appear - NODE_FADE)) / NODE_FADE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
