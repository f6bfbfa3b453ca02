use super::*;
use crate::{
    config::settings::LayoutConfig,
    graph::model::{Edge, Node, NodeKind},
    layout::engine::compute_layout,
};

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn course() -> Layout {
    // S -> A -> T and S -> B -> T; Island is disconnected.
    let g = Graph::new(
        vec![
            Node::new("S", NodeKind::Origin, 0),
            Node::new("A", NodeKind::Waypoint, 1),
            Node::new("B", NodeKind::BossArena, 1),
            Node::new("T", NodeKind::Terminal, 2),
            Node::new("Island", NodeKind::Waypoint, 2),
        ],
        vec![
            Edge::new("S", "A"),
            Edge::new("S", "B"),
            Edge::new("A", "T"),
            Edge::new("B", "T"),
        ],
        3,
    );
    compute_layout(&g, &LayoutConfig::default())
}

#[test]
fn dedupe_collapses_runs_only() {
    assert_eq!(
        dedupe_consecutive(&ids(&["a", "a", "b", "a", "a"])),
        ids(&["a", "b", "a"])
    );
}

#[test]
fn expansion_bridges_gaps_and_keeps_unreachable_pairs() {
    let layout = course();
    let g = layout.graph();
    assert_eq!(expand_visits(g, &ids(&["S", "T"])), ids(&["S", "A", "T"]));
    assert_eq!(
        expand_visits(g, &ids(&["S", "ghost", "S", "A"])),
        ids(&["S", "A"])
    );
    assert_eq!(
        expand_visits(g, &ids(&["S", "Island"])),
        ids(&["S", "Island"])
    );
}

#[test]
fn usage_counts_each_traveler_once_per_edge() {
    let usage = edge_usage(&[
        ("p1".into(), ids(&["S", "A", "S", "A"])),
        ("p2".into(), ids(&["A", "S"])),
    ]);
    assert_eq!(usage[&EdgeKey::canonical("S", "A")], ids(&["p1", "p2"]));
    assert_eq!(EdgeKey::canonical("b", "a"), EdgeKey::canonical("a", "b"));
}

#[test]
fn slots_are_symmetric_and_capped() {
    assert_eq!(slot(0, 1), 0.0);
    assert_eq!((slot(0, 2), slot(1, 2)), (-0.5, 0.5));
    assert_eq!((slot(0, 3), slot(1, 3), slot(2, 3)), (-1.0, 0.0, 1.0));
    assert_eq!(capped_slot(1, 3, 6), 0.0);
    assert_eq!(capped_slot(0, 8, 2), -0.5);
    assert_eq!(capped_slot(5, 8, 2), 0.0);
}

#[test]
fn paths_pinch_at_node_centres() {
    let layout = course();
    let travelers = vec![
        Traveler::new("p1", 0).visiting(["S", "A", "T"]),
        Traveler::new("p2", 1).visiting(["S", "A"]),
    ];
    let paths = compute_offset_paths(&layout, &travelers, &OffsetConfig::default());
    assert_eq!(paths.len(), 2);
    for tp in &paths {
        for w in &tp.path.waypoints {
            if let Some(id) = &w.node {
                assert!(w.point.distance(layout.position(id).unwrap()) < 1e-9);
            }
        }
    }
    assert_eq!(paths[0].path.first_point(), layout.position("S"));
    assert_eq!(paths[0].path.last_point(), layout.position("T"));
}

#[test]
fn shared_edges_separate_and_direction_keeps_the_side() {
    let layout = course();
    let cfg = OffsetConfig::default();
    let travelers = vec![
        Traveler::new("fwd", 0).visiting(["S", "A"]),
        Traveler::new("back", 1).visiting(["A", "S"]),
    ];
    let paths = compute_offset_paths(&layout, &travelers, &cfg);
    let mid = |tp: &TravelerPath| tp.path.interpolate(0.5).unwrap();
    let (f, b) = (mid(&paths[0]), mid(&paths[1]));
    // Two slots, one spacing apart, on opposite sides of the route.
    assert!(f.distance(b) > cfg.spacing * 0.5);

    let solo = compute_offset_paths(&layout, &travelers[..1], &cfg);
    let centre = mid(&solo[0]);
    let route = layout.route("S", "A").unwrap();
    let on_route = route
        .segments
        .iter()
        .any(|s| {
            (s.p0.distance(centre) + centre.distance(s.p1) - s.p0.distance(s.p1)).abs() < 1e-6
        });
    assert!(on_route, "a lone traveler follows the route exactly");
}

#[test]
fn unreachable_hops_are_jumps() {
    let layout = course();
    let t = Traveler::new("p", 0).visiting(["S", "Island"]);
    let paths = compute_offset_paths(&layout, &[t], &OffsetConfig::default());
    let wps = &paths[0].path.waypoints;
    assert!(wps.last().unwrap().jump);
    assert_eq!(paths[0].path.total(), 0.0);
    assert_eq!(paths[0].path.strokes().len(), 2);
}

#[test]
fn traveler_without_history_has_empty_path() {
    let layout = course();
    let idle = [Traveler::new("idle", 3)];
    let paths = compute_offset_paths(&layout, &idle, &OffsetConfig::default());
    assert!(paths[0].path.is_empty());
    assert_eq!(paths[0].color_index, 3);
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
fn line_distance(a: Point, b: Point, p: Point) -> f64 {
    let d = b - a;
    (d.cross(p - a) / d.hypot()).abs()
}

#[test]
fn bends_keep_the_full_offset() {
    let route = [
        Point::new(0.0, 0.0),
        Point::new(35.0, 0.0),
        Point::new(75.0, 40.0),
        Point::new(100.0, 40.0),
    ];
    let left = offset_polyline(&route, 5.0, 0.2);
    let right = offset_polyline(&route, -5.0, 0.2);
    assert_eq!(left.len(), 4);

    // The diagonal of each copy runs parallel to the route, a full offset away.
    for (shifted, expected) in [(&left, 5.0), (&right, 5.0)] {
        for p in [shifted[1], shifted[2]] {
            assert!((line_distance(route[1], route[2], p) - expected).abs() < 1e-9);
        }
    }
    assert!((line_distance(left[1], left[2], right[1]) - 10.0).abs() < 1e-9);
    assert_eq!((left[0], left[3]), (route[0], route[3]));
}

#[test]
fn diagonal_edges_separate_by_one_spacing() {
    let g = Graph::new(
        vec![
            Node::new("c", NodeKind::Origin, 0),
            Node::new("x", NodeKind::Waypoint, 1),
            Node::new("d", NodeKind::Waypoint, 1),
        ],
        vec![Edge::new("c", "x"), Edge::new("c", "d")],
        2,
    );
    let layout = compute_layout(&g, &LayoutConfig::default());
    let route = layout.route("c", "d").unwrap().points();
    assert_eq!(route.len(), 4);

    let cfg = OffsetConfig {
        spacing: 10.0,
        ..OffsetConfig::default()
    };
    let travelers = [
        Traveler::new("p", 0).visiting(["c", "d"]),
        Traveler::new("q", 1).visiting(["c", "d"]),
    ];
    let paths = compute_offset_paths(&layout, &travelers, &cfg);
    let diag = |k: usize| {
        let w = &paths[k].path.waypoints;
        (w[1].point, w[2].point)
    };
    let (p1, p2) = diag(0);
    let (q1, _) = diag(1);
    assert!((line_distance(p1, p2, q1) - 10.0).abs() < 1e-9);
}
