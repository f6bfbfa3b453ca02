use std::collections::{HashMap, HashSet};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Closed set of node kinds understood by the engine.
pub enum NodeKind {
    /// The unique starting node (layer 0).
    Origin,
    /// Generic waypoint.
    Waypoint,
    /// Waypoint holding a boss arena.
    BossArena,
    /// Waypoint holding a major boss.
    MajorBoss,
    /// Legacy / multi-room waypoint.
    LegacyDungeon,
    /// A finishing node.
    Terminal,
}

impl NodeKind {
    /// Resolve an input tag. Unknown tags yield `None` and the node is dropped by the parser.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "start" | "origin" => Some(Self::Origin),
            "mini_dungeon" | "waypoint" => Some(Self::Waypoint),
            "boss_arena" => Some(Self::BossArena),
            "major_boss" => Some(Self::MajorBoss),
            "legacy_dungeon" => Some(Self::LegacyDungeon),
            "final_boss" | "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }

    /// Canonical tag (the serde spelling).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Waypoint => "waypoint",
            Self::BossArena => "boss_arena",
            Self::MajorBoss => "major_boss",
            Self::LegacyDungeon => "legacy_dungeon",
            Self::Terminal => "terminal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Descriptive entrance/exit text attached to a node.
pub struct Passage {
    /// Human readable description.
    pub text: String,
    /// Node id on the other side, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A place in the course.
pub struct Node {
    /// Stable identifier.
    pub id: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Display name (defaults to the id).
    pub display_name: String,
    /// Underlying zone identifiers this node represents.
    #[serde(default)]
    pub zones: Vec<String>,
    /// Topological distance from the origin.
    pub layer: u32,
    /// Difficulty band, independent of layer.
    #[serde(default)]
    pub tier: u32,
    /// Positive weight; sizes the gap after this node's layer.
    pub weight: f64,
    /// Entrance descriptions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entrances: Vec<Passage>,
    /// Exit descriptions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exits: Vec<Passage>,
}

impl Node {
    /// Node with default attributes (weight 1, tier 0, no zones).
    pub fn new(id: impl Into<String>, kind: NodeKind, layer: u32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            kind,
            zones: Vec::new(),
            layer,
            tier: 0,
            weight: 1.0,
            entrances: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// Replace the weight; non-finite or non-positive values fall back to 1.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = sanitize_weight(weight);
        self
    }

    /// Replace the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

pub(crate) fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Directed connection between two node ids.
pub struct Edge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
}

impl Edge {
    /// Build an edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Immutable course topology.
///
/// Nodes are kept sorted by `(layer, id)`; edges keep their input order. Adjacency is indexed
/// once at construction, so every accessor is a lookup.
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    total_layers: u32,
    index: HashMap<String, usize>,
    succ: Vec<Vec<usize>>,
    pred: Vec<Vec<usize>>,
}

impl Graph {
    /// Build a graph, dropping duplicate node ids (first wins), dangling edges, self-loops and
    /// duplicate edges.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, total_layers: u32) -> Self {
        let mut seen = HashSet::new();
        let mut nodes = nodes
            .into_iter()
            .filter(|n| {
                let fresh = seen.insert(n.id.clone());
                if !fresh {
                    tracing::debug!(id = %n.id, "dropping duplicate node id");
                }
                fresh
            })
            .collect::<Vec<_>>();
        nodes.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.id.cmp(&b.id)));

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect::<HashMap<_, _>>();

        let mut kept = Vec::with_capacity(edges.len());
        let mut edge_seen = HashSet::new();
        let mut succ = vec![Vec::new(); nodes.len()];
        let mut pred = vec![Vec::new(); nodes.len()];
        for edge in edges {
            let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) else {
                tracing::debug!(from = %edge.from, to = %edge.to, "dropping dangling edge");
                continue;
            };
            if from == to {
                tracing::debug!(id = %edge.from, "dropping self-loop");
                continue;
            }
            if !edge_seen.insert((from, to)) {
                continue;
            }
            succ[from].push(to);
            pred[to].push(from);
            kept.push(edge);
        }

        let max_layer = nodes
            .iter()
            .map(|n| n.layer.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            nodes,
            edges: kept,
            total_layers: total_layers.max(max_layer),
            index,
            succ,
            pred,
        }
    }

    /// All nodes, sorted by `(layer, id)`.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All kept edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Declared layer count, raised to cover every node.
    pub fn total_layers(&self) -> u32 {
        self.total_layers
    }

    /// No usable nodes survived parsing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Position of node `id` in [`Graph::nodes`].
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Whether node `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Node by index. Panics when `idx` is out of range.
    pub fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Targets of edges leaving `idx`, in input edge order.
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.succ[idx]
    }

    /// Sources of edges entering `idx`, in input edge order.
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.pred[idx]
    }

    /// Successors and predecessors, deduplicated, in ascending index order.
    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        let mut out = self.succ[idx]
            .iter()
            .chain(self.pred[idx].iter())
            .copied()
            .collect::<Vec<_>>();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Whether a directed edge `from -> to` was kept.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.succ[a].contains(&b),
            _ => false,
        }
    }

    /// The origin node: the first `Origin` in `(layer, id)` order.
    pub fn origin_index(&self) -> Option<usize> {
        self.nodes.iter().position(|n| n.kind == NodeKind::Origin)
    }

    /// See [`Graph::origin_index`].
    pub fn origin(&self) -> Option<&Node> {
        self.origin_index().map(|i| &self.nodes[i])
    }

    /// Indices of every `Terminal` node.
    pub fn terminal_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Terminal)
            .map(|(i, _)| i)
            .collect()
    }

    /// Distinct layer numbers that hold at least one node, ascending.
    pub fn layer_values(&self) -> Vec<u32> {
        let mut out = self.nodes.iter().map(|n| n.layer).collect::<Vec<_>>();
        out.dedup();
        out
    }

    /// Node indices bucketed by populated layer, in [`Graph::layer_values`] order.
    ///
    /// Empty layers get no bucket, so sparse or huge layer numbers cost nothing.
    pub fn layers(&self) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = Vec::new();
        let mut current = None;
        for (i, n) in self.nodes.iter().enumerate() {
            if current != Some(n.layer) {
                current = Some(n.layer);
                out.push(Vec::new());
            }
            if let Some(bucket) = out.last_mut() {
                bucket.push(i);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
