use std::collections::BTreeMap;

use crate::{
    animation::waypoints::WaypointPath,
    config::settings::OffsetConfig,
    foundation::{
        core::{Point, Vec2},
        math::{EPSILON, lerp_point},
    },
    graph::{model::Graph, search::shortest_path},
    layout::engine::Layout,
    live::traveler::Traveler,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A traveler's visit history drawn as an offset polyline.
pub struct TravelerPath {
    /// Owner of the trail.
    pub traveler_id: String,
    /// Palette slot of the owner.
    pub color_index: u32,
    /// Offset polyline; hops with no route are marked as jumps.
    pub path: WaypointPath,
}

/// Undirected edge identity: the two endpoint ids in sorted order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(pub String, pub String);

impl EdgeKey {
    /// Key for the edge between `a` and `b` in either direction.
    pub fn canonical(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_owned(), b.to_owned())
        } else {
            Self(b.to_owned(), a.to_owned())
        }
    }
}

/// Collapse runs of the same id.
pub fn dedupe_consecutive(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if out.last() != Some(id) {
            out.push(id.clone());
        }
    }
    out
}

/// Visit history with every gap between non-adjacent nodes filled in.
///
/// Unknown ids are dropped and repeats collapsed. Consecutive nodes that are not adjacent are
/// bridged by the shortest route over the bidirectional graph; pairs with no route at all stay
/// adjacent in the output and are drawn as a jump.
pub fn expand_visits(graph: &Graph, visits: &[String]) -> Vec<String> {
    let known = visits
        .iter()
        .filter(|id| graph.contains(id))
        .cloned()
        .collect::<Vec<_>>();
    let visits = dedupe_consecutive(&known);

    let mut out: Vec<String> = Vec::with_capacity(visits.len());
    for id in visits {
        let Some(prev) = out.last() else {
            out.push(id);
            continue;
        };
        let bridge = graph
            .index_of(prev)
            .zip(graph.index_of(&id))
            .and_then(|(a, b)| shortest_path(graph, a, b));
        match bridge {
            Some(hops) => out.extend(
                hops.into_iter()
                    .skip(1)
                    .map(|i| graph.node_at(i).id.clone()),
            ),
            None => out.push(id),
        }
    }
    out
}

/// Travelers using each undirected edge, in input order, each counted once per edge.
pub fn edge_usage(paths: &[(String, Vec<String>)]) -> BTreeMap<EdgeKey, Vec<String>> {
    let mut usage: BTreeMap<EdgeKey, Vec<String>> = BTreeMap::new();
    for (traveler, path) in paths {
        for pair in path.windows(2) {
            let users = usage
                .entry(EdgeKey::canonical(&pair[0], &pair[1]))
                .or_default();
            if !users.contains(traveler) {
                users.push(traveler.clone());
            }
        }
    }
    usage
}

/// Slot of the `i`th of `n` travelers, symmetric around zero.
pub fn slot(i: usize, n: usize) -> f64 {
    i as f64 - (n.saturating_sub(1)) as f64 / 2.0
}

/// [`slot`] with at most `max_slots` distinct positions; travelers past the cap share the centre.
pub fn capped_slot(i: usize, n: usize, max_slots: usize) -> f64 {
    if n <= max_slots {
        slot(i, n)
    } else if i >= max_slots {
        0.0
    } else {
        slot(i, max_slots)
    }
}

/// Offset polylines for every traveler.
///
/// Every traveler on a shared edge gets its own slot, computed once on the edge's forward
/// geometry so the same traveler keeps the same side regardless of travel direction. Each
/// traversal starts and ends at the exact node centres.
#[tracing::instrument(skip_all, fields(travelers = travelers.len()))]
pub fn compute_offset_paths(
    layout: &Layout,
    travelers: &[Traveler],
    cfg: &OffsetConfig,
) -> Vec<TravelerPath> {
    let graph = layout.graph();
    let expanded = travelers
        .iter()
        .map(|t| (t.id.clone(), expand_visits(graph, &t.visit_ids())))
        .collect::<Vec<_>>();
    let usage = edge_usage(&expanded);

    travelers
        .iter()
        .zip(&expanded)
        .map(|(traveler, (_, visits))| TravelerPath {
            traveler_id: traveler.id.clone(),
            color_index: traveler.color_index,
            path: offset_path(layout, &traveler.id, visits, &usage, cfg),
        })
        .collect()
}

fn offset_path(
    layout: &Layout,
    traveler: &str,
    visits: &[String],
    usage: &BTreeMap<EdgeKey, Vec<String>>,
    cfg: &OffsetConfig,
) -> WaypointPath {
    let graph = layout.graph();
    let mut path = WaypointPath::default();
    let Some(first) = visits.first() else {
        return path;
    };
    if let Some(p) = layout.position(first) {
        path.push(p, Some(first.as_str()), false);
    }

    for pair in visits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (Some(ia), Some(ib)) = (graph.index_of(a), graph.index_of(b)) else {
            continue;
        };
        let Some(t) = layout.traversal(ia, ib) else {
            path.push(layout.position_at(ib), Some(b.as_str()), true);
            continue;
        };

        let offset = usage
            .get(&EdgeKey::canonical(a, b))
            .and_then(|users| {
                let i = users.iter().position(|u| u == traveler)?;
                Some(capped_slot(i, users.len(), cfg.max_slots) * cfg.spacing)
            })
            .unwrap_or(0.0);

        let mut points =
            offset_polyline(&layout.edges[t.edge].points(), offset, cfg.pinch_fraction);
        if t.reversed {
            points.reverse();
        }
        let n = points.len();
        for (k, p) in points.into_iter().enumerate().skip(1) {
            let node = (k + 1 == n).then_some(b.as_str());
            path.push(p, node, false);
        }
    }
    path
}

/// Cosine floor for the miter; caps the join length on near-reversing bends.
const MIN_MITER_COS: f64 = 0.25;

/// Shift the interior of a route sideways by `offset`, keeping both endpoints fixed.
///
/// Interior vertices move along the averaged normal of their two segments, lengthened so each
/// segment stays parallel to the route at distance `offset`. A straight route gains two inset
/// vertices at `pinch` of its length from each end.
fn offset_polyline(points: &[Point], offset: f64, pinch: f64) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if pts.last().is_none_or(|q| q.distance(p) > EPSILON) {
            pts.push(p);
        }
    }
    if offset.abs() <= EPSILON || pts.len() < 2 {
        return pts;
    }

    if pts.len() == 2 {
        let (p0, p1) = (pts[0], pts[1]);
        let shift = normal(p0, p1) * offset;
        return vec![
            p0,
            lerp_point(p0, p1, pinch) + shift,
            lerp_point(p0, p1, 1.0 - pinch) + shift,
            p1,
        ];
    }

    let last = pts.len() - 1;
    let mut out = Vec::with_capacity(pts.len());
    out.push(pts[0]);
    for k in 1..last {
        let incoming = normal(pts[k - 1], pts[k]);
        let avg = incoming + normal(pts[k], pts[k + 1]);
        let len = avg.hypot();
        let shift = if len > EPSILON {
            // Miter join: both neighbouring segments end up exactly `offset` away.
            let dir = avg / len;
            dir * (offset / incoming.dot(dir).max(MIN_MITER_COS))
        } else {
            incoming * offset
        };
        out.push(pts[k] + shift);
    }
    out.push(pts[last]);
    out
}

/// Unit left-hand normal of the segment `a -> b`.
fn normal(a: Point, b: Point) -> Vec2 {
    let d = b - a;
    let len = d.hypot();
    if len <= EPSILON {
        return Vec2::ZERO;
    }
    Vec2::new(-d.y / len, d.x / len)
}

#[cfg(test)]
#[path = "../../tests/unit/offset/traveler_paths.rs"]
mod tests;
