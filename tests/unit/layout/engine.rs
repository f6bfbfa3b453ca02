use super::*;
use crate::graph::model::{Edge, NodeKind};

fn merge_graph() -> Graph {
    Graph::new(
        vec![
            Node::new("A", NodeKind::Origin, 0),
            Node::new("B", NodeKind::Waypoint, 1).with_weight(4.0),
            Node::new("C", NodeKind::Waypoint, 1).with_weight(4.0),
            Node::new("D", NodeKind::Terminal, 2),
        ],
        vec![
            Edge::new("A", "B"),
            Edge::new("A", "C"),
            Edge::new("B", "D"),
            Edge::new("C", "D"),
        ],
        3,
    )
}

#[test]
fn merge_scenario_converges_on_midpoint() {
    let cfg = LayoutConfig::default();
    let layout = compute_layout(&merge_graph(), &cfg);
    let b = layout.position("B").unwrap();
    let c = layout.position("C").unwrap();
    let d = layout.position("D").unwrap();

    assert_eq!(b.x, c.x);
    assert!(((b.y - c.y).abs() - cfg.node_spacing).abs() < 1e-9);
    assert!((d.y - (b.y + c.y) / 2.0).abs() < 1e-9);
}

#[test]
fn weight_widens_following_gap() {
    let cfg = LayoutConfig::default();
    let layout = compute_layout(&merge_graph(), &cfg);
    let base = cfg.node_footprint + cfg.min_layer_gap;
    assert_eq!(layout.layer_x[0], cfg.margin_left);
    assert!((layout.layer_x[1] - layout.layer_x[0] - (base + cfg.weight_scale)).abs() < 1e-9);
    assert!((layout.layer_x[2] - layout.layer_x[1] - (base + 4.0 * cfg.weight_scale)).abs() < 1e-9);
}

#[test]
fn x_strictly_increases_with_layer() {
    let layout = compute_layout(&merge_graph(), &LayoutConfig::default());
    for w in layout.layer_x.windows(2) {
        assert!(w[1] > w[0]);
    }
    for e in &layout.edges {
        assert!(layout.position(&e.to).unwrap().x > layout.position(&e.from).unwrap().x);
    }
}

#[test]
fn minimum_y_sits_on_top_margin() {
    let cfg = LayoutConfig::default();
    let layout = compute_layout(&merge_graph(), &cfg);
    let min_y = layout
        .nodes
        .iter()
        .map(|n| n.pos.y)
        .fold(f64::INFINITY, f64::min);
    assert!((min_y - cfg.margin_top).abs() < 1e-9);
    assert!(layout.nodes.iter().all(|n| n.pos.x >= 0.0 && n.pos.y >= 0.0));
    assert!(layout.width > 0.0 && layout.height > 0.0);
}

#[test]
fn empty_graph_has_minimum_extent() {
    let cfg = LayoutConfig {
        min_width: 320.0,
        min_height: 200.0,
        ..LayoutConfig::default()
    };
    let layout = compute_layout(&Graph::default(), &cfg);
    assert!(layout.nodes.is_empty());
    assert!(layout.edges.is_empty());
    assert_eq!(layout.width, 320.0);
    assert_eq!(layout.height, 200.0);

    let layout = compute_layout(&Graph::default(), &LayoutConfig::default());
    assert_eq!((layout.width, layout.height), (0.0, 0.0));
}

#[test]
fn single_node_is_valid() {
    let g = Graph::new(vec![Node::new("A", NodeKind::Origin, 0)], vec![], 1);
    let cfg = LayoutConfig::default();
    let layout = compute_layout(&g, &cfg);
    assert_eq!(layout.position("A").unwrap(), Point::new(cfg.margin_left, cfg.margin_top));
    assert_eq!(layout.layer_pitch(), 0.0);
}

#[test]
fn routes_follow_metro_rules() {
    let layout = compute_layout(&merge_graph(), &LayoutConfig::default());
    for edge in &layout.edges {
        let a = layout.position(&edge.from).unwrap();
        let b = layout.position(&edge.to).unwrap();
        match edge.segments.len() {
            1 => assert!((a.y - b.y).abs() < 1e-6),
            3 => {
                let mid = edge.segments[1];
                let dx = (mid.p1.x - mid.p0.x).abs();
                let dy = (mid.p1.y - mid.p0.y).abs();
                assert!((dx - dy).abs() < 1e-9);
            }
            n => panic!("unexpected segment count {n}"),
        }
        assert_eq!(edge.segments.first().unwrap().p0, a);
        assert_eq!(edge.segments.last().unwrap().p1, b);
    }
}

#[test]
fn barycenter_reduces_crossings() {
    // A -> {P, Q}; P -> Y, Q -> X. Ids alone would order X above Y and cross the edges.
    let g = Graph::new(
        vec![
            Node::new("A", NodeKind::Origin, 0),
            Node::new("P", NodeKind::Waypoint, 1),
            Node::new("Q", NodeKind::Waypoint, 1),
            Node::new("X", NodeKind::Waypoint, 2),
            Node::new("Y", NodeKind::Waypoint, 2),
        ],
        vec![
            Edge::new("A", "P"),
            Edge::new("A", "Q"),
            Edge::new("P", "Y"),
            Edge::new("Q", "X"),
        ],
        3,
    );
    let layout = compute_layout(&g, &LayoutConfig::default());
    let p = layout.position("P").unwrap().y;
    let q = layout.position("Q").unwrap().y;
    let x = layout.position("X").unwrap().y;
    let y = layout.position("Y").unwrap().y;
    assert_eq!(p < q, y < x);
}

#[test]
fn traversal_finds_both_directions() {
    let layout = compute_layout(&merge_graph(), &LayoutConfig::default());
    let g = layout.graph();
    let a = g.index_of("A").unwrap();
    let b = g.index_of("B").unwrap();
    let fwd = layout.traversal(a, b).unwrap();
    let back = layout.traversal(b, a).unwrap();
    assert_eq!(fwd.edge, back.edge);
    assert!(!fwd.reversed);
    assert!(back.reversed);
    assert!(layout.traversal(a, g.index_of("D").unwrap()).is_none());
}

#[test]
fn gaps_in_layer_numbers_take_no_space() {
    let cfg = LayoutConfig::default();
    let g = Graph::new(
        vec![
            Node::new("A", NodeKind::Origin, 0),
            Node::new("B", NodeKind::Terminal, 9),
        ],
        vec![Edge::new("A", "B")],
        10,
    );
    let layout = compute_layout(&g, &cfg);
    assert_eq!(layout.layers, vec![0, 9]);
    let step = cfg.node_footprint + cfg.min_layer_gap + cfg.weight_scale;
    assert!((layout.layer_x[1] - layout.layer_x[0] - step).abs() < 1e-9);
    assert_eq!(layout.x_of_layer(4), Some(layout.layer_x[1]));
    assert_eq!(layout.x_of_layer(50), Some(layout.layer_x[1]));
}
