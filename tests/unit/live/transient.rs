use super::*;
use crate::{
    config::settings::LayoutConfig,
    graph::model::{Edge, Graph, Node, NodeKind},
    layout::engine::compute_layout,
    live::traveler::TravelerStatus,
};

fn layout() -> Layout {
    let g = Graph::new(
        vec![
            Node::new("S", NodeKind::Origin, 0),
            Node::new("B", NodeKind::BossArena, 1),
        ],
        vec![Edge::new("S", "B")],
        2,
    );
    compute_layout(&g, &LayoutConfig::default())
}

fn at_boss(deaths: u32) -> Traveler {
    let mut t = Traveler::new("p", 4)
        .with_status(TravelerStatus::InProgress)
        .visiting(["S", "B"]);
    t.deaths = deaths;
    t
}

#[test]
fn first_sighting_only_sets_baseline() {
    let layout = layout();
    let mut fx = TransientMarkers::new(2.0);
    assert_eq!(fx.observe(&layout, &[at_boss(5)], 0.0), 0);
    assert!(fx.is_empty());
}

#[test]
fn increases_spawn_at_the_traveler_node() {
    let layout = layout();
    let mut fx = TransientMarkers::new(2.0);
    fx.observe(&layout, &[at_boss(0)], 0.0);
    assert_eq!(fx.observe(&layout, &[at_boss(0)], 1.0), 0);
    assert_eq!(fx.observe(&layout, &[at_boss(2)], 1.5), 1);
    let m = &fx.active()[0];
    assert_eq!(m.node_id, "B");
    assert_eq!(m.point, layout.position("B").unwrap());
    assert_eq!(m.color_index, 4);
}

#[test]
fn decreases_reset_without_spawning() {
    let layout = layout();
    let mut fx = TransientMarkers::new(2.0);
    fx.observe(&layout, &[at_boss(3)], 0.0);
    assert_eq!(fx.observe(&layout, &[at_boss(0)], 1.0), 0);
    assert_eq!(fx.observe(&layout, &[at_boss(1)], 2.0), 1);
}

#[test]
fn markers_expire_after_display_time() {
    let layout = layout();
    let mut fx = TransientMarkers::new(2.0);
    fx.observe(&layout, &[at_boss(0)], 0.0);
    fx.observe(&layout, &[at_boss(1)], 10.0);
    assert_eq!(fx.sample(11.0).len(), 1);
    assert!(fx.sample(12.0).is_empty());
    assert!(fx.is_empty());
}

#[test]
fn curve_pops_settles_and_fades() {
    assert_eq!(transient_curve(0.0), (0.0, 1.0));
    let (peak, _) = transient_curve(POP_END);
    assert!((peak - PEAK_SCALE).abs() < 1e-9);
    assert_eq!(transient_curve(0.5), (1.0, 1.0));
    let (_, fading) = transient_curve(0.8);
    assert!((fading - 0.5).abs() < 1e-9);
    assert_eq!(transient_curve(1.0).1, 0.0);
    assert_eq!(transient_curve(f64::NAN), (0.0, 1.0));
}

#[test]
fn pop_overshoots_before_landing_on_peak() {
    let max = (1..100)
        .map(|i| transient_curve(POP_END * f64::from(i) / 100.0).0)
        .fold(0.0, f64::max);
    assert!(max > PEAK_SCALE);
}

#[test]
fn departed_travelers_are_forgotten() {
    let layout = layout();
    let mut fx = TransientMarkers::new(2.0);
    fx.observe(&layout, &[at_boss(0)], 0.0);
    assert_eq!(fx.observe(&layout, &[], 1.0), 0);
    assert!(fx.baseline.is_empty());
    // Returning counts as a first sighting again.
    assert_eq!(fx.observe(&layout, &[at_boss(4)], 2.0), 0);
    assert_eq!(fx.baseline.get("p"), Some(&4));
}
