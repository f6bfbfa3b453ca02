use super::*;
use crate::{
    config::settings::LayoutConfig,
    graph::model::{Edge, Graph, Node, NodeKind},
    layout::engine::compute_layout,
    live::traveler::Traveler,
};

fn long_chain() -> Layout {
    let ids = (0..10).map(|i| format!("n{i}")).collect::<Vec<_>>();
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let kind = match i {
                0 => NodeKind::Origin,
                9 => NodeKind::Terminal,
                _ => NodeKind::Waypoint,
            };
            Node::new(id.clone(), kind, i as u32)
        })
        .collect();
    let edges = ids.windows(2).map(|w| Edge::new(&w[0], &w[1])).collect();
    compute_layout(&Graph::new(nodes, edges, 10), &LayoutConfig::default())
}

fn running(at: &[&str]) -> LiveSnapshot {
    LiveSnapshot {
        race_status: RaceStatus::Running,
        travelers: at
            .iter()
            .enumerate()
            .map(|(i, node)| {
                Traveler::new(format!("p{i}"), i as u32)
                    .with_status(TravelerStatus::InProgress)
                    .visiting([*node])
            })
            .collect(),
    }
}

#[test]
fn finished_race_shows_everything() {
    let layout = long_chain();
    let snap = LiveSnapshot {
        race_status: RaceStatus::Finished,
        travelers: vec![],
    };
    assert_eq!(
        target_viewport(&layout, &snap, &ViewportConfig::default()),
        full_extent(&layout)
    );
}

#[test]
fn setup_window_sits_on_origin_with_minimum_width() {
    let layout = long_chain();
    let cfg = ViewportConfig::default();
    let view = target_viewport(&layout, &LiveSnapshot::default(), &cfg);
    let origin = layout.origin().unwrap().pos;
    assert!(view.contains(origin));
    assert!((view.width() - cfg.min_visible_layers as f64 * layout.layer_pitch()).abs() < 1e-9);
    assert_eq!((view.y0, view.y1), (0.0, layout.height));
}

#[test]
fn leader_is_never_clipped() {
    let layout = long_chain();
    let cfg = ViewportConfig::default();
    // Barycenter near the start, leader far ahead.
    let snap = running(&["n0", "n0", "n0", "n7"]);
    let view = target_viewport(&layout, &snap, &cfg);
    let leader = layout.position("n7").unwrap();
    assert!(view.x1 >= leader.x + cfg.padding - 1e-9);
    assert!(view.x0 >= 0.0 && view.x1 <= layout.width + 1e-9);
}

#[test]
fn window_is_centred_on_the_pack() {
    let layout = long_chain();
    let snap = running(&["n4", "n5"]);
    let view = target_viewport(&layout, &snap, &ViewportConfig::default());
    let mid = (layout.position("n4").unwrap().x + layout.position("n5").unwrap().x) / 2.0;
    assert!((view.center().x - mid).abs() < 1e-9);
}

#[test]
fn follow_snaps_then_smooths() {
    let cfg = ViewportConfig::default();
    let mut cam = FollowViewport::new(&cfg);
    let a = Rect::new(0.0, 0.0, 100.0, 50.0);
    let b = Rect::new(200.0, 0.0, 300.0, 50.0);
    assert_eq!(cam.advance(a, 0.016), a);
    let step = cam.advance(b, 0.016);
    assert!(step.x0 > a.x0 && step.x0 < b.x0);
    let mut last = step;
    for _ in 0..600 {
        last = cam.advance(b, 0.016);
    }
    assert!((last.x0 - b.x0).abs() < 1e-3);
    assert_eq!(cam.advance(b, 0.0), last);
}
