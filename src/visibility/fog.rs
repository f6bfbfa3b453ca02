use std::collections::{BTreeMap, BTreeSet};

use crate::{config::settings::VisibilityConfig, graph::model::Graph, live::traveler::Traveler};

/// Fog-of-war class of a node, ordered from most to least visible.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeVisibility {
    /// Visited by the observer (or the origin).
    Discovered,
    /// Not visited but directly connected to a discovered node; shown as an unknown marker.
    Adjacent,
    /// Not drawn at all.
    Hidden,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A directed edge that survives the fog.
pub struct EdgeVisibility {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// 1 when both endpoints are discovered, dimmed otherwise.
    pub opacity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Result of [`classify`].
pub struct VisibilityMap {
    /// Class of every node in the graph.
    pub nodes: BTreeMap<String, NodeVisibility>,
    /// Visible edges only, in graph edge order.
    pub edges: Vec<EdgeVisibility>,
    #[serde(skip)]
    adjacent_opacity: f64,
}

impl VisibilityMap {
    /// Class of node `id`; unknown ids are `Hidden`.
    pub fn get(&self, id: &str) -> NodeVisibility {
        self.nodes
            .get(id)
            .copied()
            .unwrap_or(NodeVisibility::Hidden)
    }

    /// Anything but `Hidden`.
    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id) != NodeVisibility::Hidden
    }

    /// Draw opacity for node `id`.
    pub fn node_opacity(&self, id: &str) -> f64 {
        match self.get(id) {
            NodeVisibility::Discovered => 1.0,
            NodeVisibility::Adjacent => self.adjacent_opacity,
            NodeVisibility::Hidden => 0.0,
        }
    }

    /// Draw opacity for `from -> to`; `None` when the edge is fogged out.
    pub fn edge_opacity(&self, from: &str, to: &str) -> Option<f64> {
        self.edges
            .iter()
            .find(|e| e.from == from && e.to == to)
            .map(|e| e.opacity)
    }

    /// `(discovered, adjacent, hidden)` node counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.nodes
            .values()
            .fold((0, 0, 0), |(d, a, h), v| match v {
                NodeVisibility::Discovered => (d + 1, a, h),
                NodeVisibility::Adjacent => (d, a + 1, h),
                NodeVisibility::Hidden => (d, a, h + 1),
            })
    }
}

/// Node ids an observer has seen: its visit history plus its current node.
pub fn discovered_from(traveler: &Traveler) -> BTreeSet<String> {
    traveler.visit_ids().into_iter().collect()
}

/// Classify every node for an observer who has visited `discovered`.
///
/// The origin is always discovered; unknown ids are ignored. A node is adjacent when an edge in
/// either direction joins it to a discovered node. An edge is visible when neither endpoint is
/// hidden.
#[tracing::instrument(skip_all, fields(discovered = discovered.len()))]
pub fn classify(
    graph: &Graph,
    discovered: &BTreeSet<String>,
    cfg: &VisibilityConfig,
) -> VisibilityMap {
    let mut found = vec![false; graph.len()];
    for id in discovered {
        if let Some(i) = graph.index_of(id) {
            found[i] = true;
        }
    }
    if let Some(origin) = graph.origin_index() {
        found[origin] = true;
    }

    let classes = (0..graph.len())
        .map(|i| {
            if found[i] {
                NodeVisibility::Discovered
            } else if graph.neighbors(i).into_iter().any(|n| found[n]) {
                NodeVisibility::Adjacent
            } else {
                NodeVisibility::Hidden
            }
        })
        .collect::<Vec<_>>();

    let edges = graph
        .edges()
        .iter()
        .filter_map(|e| {
            let a = graph.index_of(&e.from)?;
            let b = graph.index_of(&e.to)?;
            let (ca, cb) = (classes[a], classes[b]);
            if ca == NodeVisibility::Hidden || cb == NodeVisibility::Hidden {
                return None;
            }
            let both = ca == NodeVisibility::Discovered && cb == NodeVisibility::Discovered;
            Some(EdgeVisibility {
                from: e.from.clone(),
                to: e.to.clone(),
                opacity: if both { 1.0 } else { cfg.dim_edge_opacity },
            })
        })
        .collect();

    VisibilityMap {
        nodes: graph
            .nodes()
            .iter()
            .zip(classes)
            .map(|(n, c)| (n.id.clone(), c))
            .collect(),
        edges,
        adjacent_opacity: cfg.adjacent_node_opacity,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/fog.rs"]
mod tests;
