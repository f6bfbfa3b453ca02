use super::*;
use crate::{
    config::settings::LayoutConfig,
    graph::model::{Edge, Node},
    layout::engine::compute_layout,
};

fn branching() -> Layout {
    // A -> {B, C, E}; B -> D; C -> D; E -> F (terminal); D terminal.
    let g = Graph::new(
        vec![
            Node::new("A", NodeKind::Origin, 0),
            Node::new("B", NodeKind::Waypoint, 1),
            Node::new("C", NodeKind::BossArena, 1),
            Node::new("E", NodeKind::Waypoint, 1),
            Node::new("D", NodeKind::Terminal, 2),
            Node::new("F", NodeKind::Terminal, 2),
        ],
        vec![
            Edge::new("A", "B"),
            Edge::new("A", "C"),
            Edge::new("A", "E"),
            Edge::new("B", "D"),
            Edge::new("C", "D"),
            Edge::new("E", "F"),
        ],
        3,
    );
    compute_layout(&g, &LayoutConfig::default())
}

#[test]
fn every_path_runs_origin_to_terminal_over_real_edges() {
    let layout = branching();
    let paths = enumerate_paths(&layout, 100);
    assert_eq!(paths.len(), 3);
    let g = layout.graph();
    for p in &paths {
        assert_eq!(p.first().map(String::as_str), Some("A"));
        assert_eq!(g.node(p.last().unwrap()).unwrap().kind, NodeKind::Terminal);
        for w in p.windows(2) {
            assert!(g.has_edge(&w[0], &w[1]));
        }
    }
}

#[test]
fn limit_caps_enumeration() {
    assert_eq!(enumerate_paths(&branching(), 2).len(), 2);
}

#[test]
fn no_origin_means_no_paths() {
    let g = Graph::new(vec![Node::new("Z", NodeKind::Terminal, 0)], vec![], 1);
    let layout = compute_layout(&g, &LayoutConfig::default());
    assert!(enumerate_paths(&layout, 10).is_empty());
}

#[test]
fn cycles_terminate() {
    let g = Graph::new(
        vec![
            Node::new("A", NodeKind::Origin, 0),
            Node::new("B", NodeKind::Waypoint, 1),
            Node::new("C", NodeKind::Waypoint, 1),
            Node::new("D", NodeKind::Terminal, 2),
        ],
        vec![
            Edge::new("A", "B"),
            Edge::new("B", "C"),
            Edge::new("C", "B"),
            Edge::new("C", "D"),
        ],
        3,
    );
    let layout = compute_layout(&g, &LayoutConfig::default());
    let paths = enumerate_paths(&layout, 10);
    assert_eq!(paths, vec![vec!["A", "B", "C", "D"]]);
}

#[test]
fn diverse_selection_prefers_disjoint_paths() {
    let paths = enumerate_paths(&branching(), 100);
    let picked = select_diverse_paths(&paths, 2, 7);
    assert_eq!(picked.len(), 2);
    assert_ne!(picked[0], picked[1]);
    // The E-F branch shares only the origin with either D branch, so it is always picked.
    assert!(picked.iter().any(|p| p.last().map(String::as_str) == Some("F")));
}

#[test]
fn diverse_selection_cycles_and_is_deterministic() {
    let paths = enumerate_paths(&branching(), 100);
    let picked = select_diverse_paths(&paths, 5, 11);
    assert_eq!(picked.len(), 5);
    assert_eq!(picked[0], picked[3]);
    assert_eq!(picked, select_diverse_paths(&paths, 5, 11));
    assert!(select_diverse_paths(&[], 3, 0).is_empty());
}
