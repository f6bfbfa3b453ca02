use std::collections::HashMap;

use crate::{
    config::settings::LayoutConfig,
    foundation::core::{Line, Point},
    graph::model::{Graph, Node},
    layout::route::route_edge,
};

#[derive(Clone, Debug, serde::Serialize)]
/// A node with its assigned position.
pub struct LaidOutNode {
    /// Source node.
    pub node: Node,
    /// Node centre.
    pub pos: Point,
}

#[derive(Clone, Debug, serde::Serialize)]
/// An edge with its metro-style route.
pub struct RoutedEdge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// One or three contiguous segments from the source centre to the target centre.
    pub segments: Vec<Line>,
}

impl RoutedEdge {
    /// Route vertices: start, every bend, end.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            out.push(first.p0);
        }
        out.extend(self.segments.iter().map(|s| s.p1));
        out
    }
}

/// How a consecutive node pair maps onto a physical edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    /// Index into [`Layout::edges`].
    pub edge: usize,
    /// `true` when walking the edge from its target to its source.
    pub reversed: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
/// Result of [`compute_layout`].
///
/// `nodes[i]` corresponds to `graph().nodes()[i]` and `edges[i]` to `graph().edges()[i]`.
pub struct Layout {
    /// Positioned nodes.
    pub nodes: Vec<LaidOutNode>,
    /// Routed edges.
    pub edges: Vec<RoutedEdge>,
    /// Populated layer numbers, ascending.
    pub layers: Vec<u32>,
    /// X coordinate of every populated layer, parallel to `layers`.
    pub layer_x: Vec<f64>,
    /// Total width including margins.
    pub width: f64,
    /// Total height including margins.
    pub height: f64,
    #[serde(skip)]
    graph: Graph,
    #[serde(skip)]
    edge_index: HashMap<(usize, usize), usize>,
}

impl Layout {
    fn empty(graph: &Graph, cfg: &LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            layers: Vec::new(),
            layer_x: Vec::new(),
            width: cfg.min_width,
            height: cfg.min_height,
            graph: graph.clone(),
            edge_index: HashMap::new(),
        }
    }

    /// The graph this layout was computed from.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Placement of node `id`.
    pub fn laid_out(&self, id: &str) -> Option<&LaidOutNode> {
        self.graph.index_of(id).map(|i| &self.nodes[i])
    }

    /// Center of node `id`.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.laid_out(id).map(|n| n.pos)
    }

    /// Center of the node at graph index `idx`.
    pub fn position_at(&self, idx: usize) -> Point {
        self.nodes[idx].pos
    }

    /// The directed edge `from -> to`.
    pub fn route(&self, from: &str, to: &str) -> Option<&RoutedEdge> {
        let a = self.graph.index_of(from)?;
        let b = self.graph.index_of(to)?;
        self.edge_index.get(&(a, b)).map(|&i| &self.edges[i])
    }

    /// The physical edge connecting two node indices in either direction, forward preferred.
    pub fn traversal(&self, a: usize, b: usize) -> Option<Traversal> {
        if let Some(&edge) = self.edge_index.get(&(a, b)) {
            return Some(Traversal {
                edge,
                reversed: false,
            });
        }
        self.edge_index.get(&(b, a)).map(|&edge| Traversal {
            edge,
            reversed: true,
        })
    }

    /// Placement of the graph's origin.
    pub fn origin(&self) -> Option<&LaidOutNode> {
        self.graph.origin_index().map(|i| &self.nodes[i])
    }

    /// Placements of every terminal node.
    pub fn terminals(&self) -> Vec<&LaidOutNode> {
        self.graph
            .terminal_indices()
            .into_iter()
            .map(|i| &self.nodes[i])
            .collect()
    }

    /// X of a layer. Unpopulated layers take the x of the next populated one; layers beyond
    /// the last clamp to it.
    pub fn x_of_layer(&self, layer: u32) -> Option<f64> {
        let last = self.layer_x.len().checked_sub(1)?;
        let rank = self.layers.partition_point(|&l| l < layer).min(last);
        Some(self.layer_x[rank])
    }

    /// Mean horizontal distance between consecutive layers.
    pub fn layer_pitch(&self) -> f64 {
        match self.layer_x.as_slice() {
            [] | [_] => 0.0,
            [first, .., last] => (last - first) / ((self.layer_x.len() - 1) as f64),
        }
    }
}

/// Lay out a course graph left to right by layer.
///
/// Horizontal: the first populated layer sits at the left margin and every following populated
/// layer advances by the node footprint, the minimum gap, and the heaviest weight of the previous
/// layer scaled to pixels. Gaps in layer numbering take no space.
///
/// Vertical: a two-pass barycenter heuristic. The forward pass orders each layer by the mean y
/// of its placed parents and spaces it evenly around that mean; the backward pass re-orders every
/// layer except the last by the mean y of its children. Coordinates are then shifted so the
/// smallest y equals the top margin.
#[tracing::instrument(skip(graph, cfg), fields(nodes = graph.len(), edges = graph.edges().len()))]
pub fn compute_layout(graph: &Graph, cfg: &LayoutConfig) -> Layout {
    if graph.is_empty() {
        return Layout::empty(graph, cfg);
    }

    let layers = graph.layers();
    let layer_x = horizontal_positions(graph, &layers, cfg);
    let ys = vertical_positions(graph, &layers, cfg.node_spacing);

    let mut rank_of = vec![0usize; graph.len()];
    for (rank, members) in layers.iter().enumerate() {
        for &i in members {
            rank_of[i] = rank;
        }
    }

    let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = cfg.margin_top - min_y;

    let nodes = graph
        .nodes()
        .iter()
        .zip(ys.iter().zip(&rank_of))
        .map(|(node, (&y, &rank))| LaidOutNode {
            node: node.clone(),
            pos: Point::new(layer_x[rank], y + shift),
        })
        .collect::<Vec<_>>();

    let mut edge_index = HashMap::with_capacity(graph.edges().len());
    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let a = graph.index_of(&e.from)?;
            let b = graph.index_of(&e.to)?;
            edge_index.insert((a, b), i);
            Some(RoutedEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                segments: route_edge(nodes[a].pos, nodes[b].pos),
            })
        })
        .collect::<Vec<_>>();

    let max_x = nodes.iter().map(|n| n.pos.x).fold(0.0, f64::max);
    let max_y = nodes.iter().map(|n| n.pos.y).fold(0.0, f64::max);

    Layout {
        nodes,
        edges,
        width: (max_x + cfg.margin_left).max(cfg.min_width),
        height: (max_y + cfg.margin_top).max(cfg.min_height),
        layers: graph.layer_values(),
        layer_x,
        graph: graph.clone(),
        edge_index,
    }
}

fn horizontal_positions(graph: &Graph, layers: &[Vec<usize>], cfg: &LayoutConfig) -> Vec<f64> {
    let mut out = Vec::with_capacity(layers.len());
    let mut x = cfg.margin_left;
    for l in 0..layers.len() {
        if l > 0 {
            let prev_weight = layers[l - 1]
                .iter()
                .map(|&i| graph.node_at(i).weight)
                .fold(0.0, f64::max);
            x += cfg.node_footprint + cfg.min_layer_gap + prev_weight * cfg.weight_scale;
        }
        out.push(x);
    }
    out
}

fn vertical_positions(graph: &Graph, layers: &[Vec<usize>], spacing: f64) -> Vec<f64> {
    let n = graph.len();
    let mut ys = vec![0.0f64; n];
    let mut placed = vec![false; n];

    // Forward pass: parents -> children.
    for members in layers {
        if members.is_empty() {
            continue;
        }
        let keyed = members
            .iter()
            .map(|&i| {
                let key = mean_of(graph.predecessors(i).iter().filter(|&&p| placed[p]), &ys)
                    .unwrap_or(0.0);
                (i, key)
            })
            .collect::<Vec<_>>();
        spread(keyed, &mut ys, spacing);
        for &i in members {
            placed[i] = true;
        }
    }

    // Backward pass: children -> parents, the last layer stays fixed.
    let last = layers.iter().rposition(|m| !m.is_empty()).unwrap_or(0);
    for members in layers[..last].iter().rev() {
        if members.is_empty() {
            continue;
        }
        let keyed = members
            .iter()
            .map(|&i| {
                let key = mean_of(graph.successors(i).iter(), &ys).unwrap_or(ys[i]);
                (i, key)
            })
            .collect::<Vec<_>>();
        spread(keyed, &mut ys, spacing);
    }

    ys
}

fn mean_of<'a>(indices: impl Iterator<Item = &'a usize>, ys: &[f64]) -> Option<f64> {
    let (sum, count) = indices.fold((0.0, 0usize), |(s, c), &i| (s + ys[i], c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Order one layer by key (ties: current y, then index) and space it evenly around the mean key.
fn spread(mut keyed: Vec<(usize, f64)>, ys: &mut [f64], spacing: f64) {
    let center = keyed.iter().map(|(_, k)| k).sum::<f64>() / keyed.len() as f64;
    keyed.sort_by(|(ia, ka), (ib, kb)| {
        ka.total_cmp(kb)
            .then_with(|| ys[*ia].total_cmp(&ys[*ib]))
            .then_with(|| ia.cmp(ib))
    });
    let half = (keyed.len() as f64 - 1.0) / 2.0;
    for (rank, (i, _)) in keyed.into_iter().enumerate() {
        ys[i] = center + (rank as f64 - half) * spacing;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
