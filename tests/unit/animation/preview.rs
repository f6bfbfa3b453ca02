use super::*;
use crate::{
    config::settings::LayoutConfig,
    graph::model::{Edge, Graph, Node, NodeKind},
    layout::engine::compute_layout,
};

fn diamond() -> Layout {
    let g = Graph::new(
        vec![
            Node::new("S", NodeKind::Origin, 0),
            Node::new("U", NodeKind::Waypoint, 1),
            Node::new("D", NodeKind::LegacyDungeon, 1),
            Node::new("T", NodeKind::Terminal, 2),
        ],
        vec![
            Edge::new("S", "U"),
            Edge::new("S", "D"),
            Edge::new("U", "T"),
            Edge::new("D", "T"),
        ],
        3,
    );
    compute_layout(&g, &LayoutConfig::default())
}

fn cfg() -> AnimationConfig {
    AnimationConfig {
        draw_in_secs: 2.0,
        race_loop_secs: 4.0,
        race_pause_secs: 1.0,
        hero_count: 2,
        hero_stagger: 0.25,
        ..AnimationConfig::default()
    }
}

#[test]
fn draw_in_precedes_racing() {
    let anim = PreviewAnimation::new(&diamond(), &cfg());
    assert_eq!(anim.phase_at(0.0), PreviewPhase::DrawIn { progress: 0.0 });
    assert_eq!(anim.phase_at(1.0), PreviewPhase::DrawIn { progress: 0.5 });
    assert_eq!(anim.phase_at(2.0), PreviewPhase::Racing { progress: 0.0 });
    assert_eq!(anim.phase_at(4.0), PreviewPhase::Racing { progress: 0.5 });
    // Pause holds at the end of the loop, then it restarts.
    assert_eq!(anim.phase_at(6.5), PreviewPhase::Racing { progress: 1.0 });
    assert_eq!(anim.phase_at(7.0), PreviewPhase::Racing { progress: 0.0 });
    assert_eq!(anim.phase_at(f64::NAN), PreviewPhase::DrawIn { progress: 0.0 });
}

#[test]
fn draw_in_frames_have_no_heroes_and_partial_edges() {
    let anim = PreviewAnimation::new(&diamond(), &cfg());
    let frame = anim.sample(0.5);
    assert!(frame.heroes.is_empty());
    assert_eq!(frame.edge_progress.len(), 4);
    assert!(frame.edge_progress.iter().any(|&p| p > 0.0 && p < 1.0));
    assert_eq!(frame.node_opacity["S"], 1.0);
    assert_eq!(frame.node_opacity["T"], 0.0);
}

#[test]
fn racing_frames_show_everything_and_distinct_heroes() {
    let layout = diamond();
    let anim = PreviewAnimation::new(&layout, &cfg());
    assert_eq!(anim.hero_paths().len(), 2);
    assert_ne!(anim.hero_paths()[0], anim.hero_paths()[1]);

    let frame = anim.sample(2.0);
    assert!(frame.edge_progress.iter().all(|&p| p == 1.0));
    assert!(frame.node_opacity.values().all(|&o| o == 1.0));
    let origin = layout.position("S").unwrap();
    for hero in &frame.heroes {
        assert!(hero.point.unwrap().distance(origin) < 1e-9);
    }

    let end = anim.sample(6.0);
    let terminal = layout.position("T").unwrap();
    for hero in &end.heroes {
        assert_eq!(hero.progress, 1.0);
        assert!(hero.point.unwrap().distance(terminal) < 1e-9);
    }
}

#[test]
fn later_heroes_start_later() {
    let anim = PreviewAnimation::new(&diamond(), &cfg());
    let frame = anim.sample(2.0 + 0.2 * 4.0);
    assert!(frame.heroes[0].progress > 0.0);
    assert_eq!(frame.heroes[1].progress, 0.0);
}

#[test]
fn course_without_origin_previews_without_heroes() {
    let g = Graph::new(vec![Node::new("X", NodeKind::Waypoint, 0)], vec![], 1);
    let anim = PreviewAnimation::new(&compute_layout(&g, &LayoutConfig::default()), &cfg());
    assert!(anim.sample(3.0).heroes.is_empty());
}
