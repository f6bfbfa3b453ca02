use crate::{
    foundation::{
        core::Point,
        math::{EPSILON, lerp_point, unit_clamp},
    },
    graph::search::shortest_path,
    layout::engine::Layout,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One vertex of a traveler polyline.
pub struct Waypoint {
    /// Vertex position.
    pub point: Point,
    /// Cumulative distance from the first waypoint.
    pub distance: f64,
    /// Node id when this vertex is a node centre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Starts a new stroke: the previous vertex is not connected to this one.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub jump: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Polyline with cumulative distances, interpolated by distance rather than by vertex.
pub struct WaypointPath {
    /// Vertices in travel order; distances are non-decreasing.
    pub waypoints: Vec<Waypoint>,
}

impl WaypointPath {
    /// Total travelled distance (jumps add nothing).
    pub fn total(&self) -> f64 {
        self.waypoints.last().map_or(0.0, |w| w.distance)
    }

    /// No vertices at all.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Start of the path.
    pub fn first_point(&self) -> Option<Point> {
        self.waypoints.first().map(|w| w.point)
    }

    /// End of the path.
    pub fn last_point(&self) -> Option<Point> {
        self.waypoints.last().map(|w| w.point)
    }

    /// Append a vertex. Zero-length steps are merged into the previous vertex.
    pub(crate) fn push(&mut self, point: Point, node: Option<&str>, jump: bool) {
        let Some(last) = self.waypoints.last_mut() else {
            self.waypoints.push(Waypoint {
                point,
                distance: 0.0,
                node: node.map(str::to_owned),
                jump: false,
            });
            return;
        };

        let step = last.point.distance(point);
        if step <= EPSILON {
            if last.node.is_none() {
                last.node = node.map(str::to_owned);
            }
            return;
        }

        let distance = if jump {
            last.distance
        } else {
            last.distance + step
        };
        self.waypoints.push(Waypoint {
            point,
            distance,
            node: node.map(str::to_owned),
            jump,
        });
    }

    /// Connected runs of points, split at jumps.
    pub fn strokes(&self) -> Vec<Vec<Point>> {
        let mut out: Vec<Vec<Point>> = Vec::new();
        for w in &self.waypoints {
            match out.last_mut() {
                Some(stroke) if !w.jump => stroke.push(w.point),
                _ => out.push(vec![w.point]),
            }
        }
        out
    }

    /// Point at `progress` of the total distance; progress is clamped to `[0, 1]`.
    pub fn interpolate(&self, progress: f64) -> Option<Point> {
        let first = self.waypoints.first()?;
        let last = self.waypoints.last()?;
        let progress = unit_clamp(progress);
        let total = last.distance;
        if total <= 0.0 || progress <= 0.0 {
            return Some(first.point);
        }
        if progress >= 1.0 {
            return Some(last.point);
        }

        let target = progress * total;
        let i = self.waypoints.partition_point(|w| w.distance < target);
        if i == 0 {
            return Some(first.point);
        }
        let Some(b) = self.waypoints.get(i) else {
            return Some(last.point);
        };
        let a = &self.waypoints[i - 1];
        let span = b.distance - a.distance;
        if span <= 0.0 {
            return Some(b.point);
        }
        Some(lerp_point(a.point, b.point, (target - a.distance) / span))
    }

    /// The prefix of the polyline up to `progress`, for partially drawn trails.
    pub fn trail(&self, progress: f64) -> WaypointPath {
        let progress = unit_clamp(progress);
        let target = progress * self.total();
        let mut out = WaypointPath::default();
        for w in &self.waypoints {
            if w.distance <= target {
                out.waypoints.push(w.clone());
            } else {
                break;
            }
        }
        if let Some(p) = self.interpolate(progress) {
            out.push(p, None, false);
        }
        out
    }
}

/// Polyline through `nodes` following routed edge geometry.
///
/// Consecutive nodes joined by an edge (either direction) walk that edge's segments. Pairs
/// without a direct edge are bridged by the shortest route over the bidirectional graph so the
/// line always follows real topology. Pairs that cannot be connected at all produce a jump
/// instead of a straight line through empty space. Unknown node ids are skipped.
pub fn build_waypoints(layout: &Layout, nodes: &[String]) -> WaypointPath {
    let graph = layout.graph();
    let indices = nodes
        .iter()
        .filter_map(|id| graph.index_of(id))
        .collect::<Vec<_>>();

    let mut path = WaypointPath::default();
    let Some(&first) = indices.first() else {
        return path;
    };
    path.push(layout.position_at(first), Some(graph.node_at(first).id.as_str()), false);

    for pair in indices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            continue;
        }
        match hops_between(layout, a, b) {
            Some(hops) => {
                for hop in hops.windows(2) {
                    walk_edge(layout, hop[0], hop[1], &mut path);
                }
            }
            None => {
                tracing::debug!(
                    from = %graph.node_at(a).id,
                    to = %graph.node_at(b).id,
                    "no route between nodes, jumping"
                );
                path.push(layout.position_at(b), Some(graph.node_at(b).id.as_str()), true);
            }
        }
    }
    path
}

/// Node indices from `a` to `b` inclusive along real edges.
pub(crate) fn hops_between(layout: &Layout, a: usize, b: usize) -> Option<Vec<usize>> {
    if layout.traversal(a, b).is_some() {
        return Some(vec![a, b]);
    }
    shortest_path(layout.graph(), a, b)
}

fn walk_edge(layout: &Layout, a: usize, b: usize, path: &mut WaypointPath) {
    let graph = layout.graph();
    let Some(t) = layout.traversal(a, b) else {
        path.push(layout.position_at(b), Some(graph.node_at(b).id.as_str()), true);
        return;
    };
    let mut points = layout.edges[t.edge].points();
    if t.reversed {
        points.reverse();
    }
    let n = points.len();
    for (k, p) in points.into_iter().enumerate().skip(1) {
        let node = (k + 1 == n).then(|| graph.node_at(b).id.as_str());
        path.push(p, node, false);
    }
}

/// Convenience wrapper over [`WaypointPath::interpolate`].
pub fn interpolate(path: &WaypointPath, progress: f64) -> Option<Point> {
    path.interpolate(progress)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/waypoints.rs"]
mod tests;
