use std::{collections::BTreeMap, f64::consts::TAU};

use crate::{
    config::settings::MarkerConfig,
    foundation::core::{Point, Vec2},
    graph::model::NodeKind,
    layout::engine::Layout,
    live::traveler::{Traveler, TravelerStatus},
    offset::traveler_paths::slot,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Which rule positioned a [`Marker`].
pub enum MarkerPlacement {
    /// Waiting in the column beside the origin.
    StartLine,
    /// Circling the occupied node.
    Orbit,
    /// Parked at the last known node.
    Parked,
    /// Waiting in the column beside a terminal.
    FinishLine,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Where and how to draw one traveler.
pub struct Marker {
    /// Traveler this marker belongs to.
    pub traveler_id: String,
    /// Name shown next to the marker.
    pub display_name: String,
    /// Palette slot.
    pub color_index: u32,
    /// Positioning rule that applied.
    pub placement: MarkerPlacement,
    /// Node the marker is anchored to.
    pub node_id: String,
    /// Marker center.
    pub point: Point,
    /// Reduced for abandoned travelers.
    pub opacity: f64,
}

/// Marker positions for every traveler at time `now_secs`.
///
/// Travelers whose anchor node cannot be found in the layout are omitted. Marker order follows
/// input order.
pub fn compute_markers(
    layout: &Layout,
    travelers: &[Traveler],
    now_secs: f64,
    cfg: &MarkerConfig,
) -> Vec<Marker> {
    let anchors = travelers
        .iter()
        .map(|t| anchor_of(layout, t))
        .collect::<Vec<_>>();

    // Group sizes and ranks per (placement, node), in input order.
    let mut groups: BTreeMap<(u8, &str), usize> = BTreeMap::new();
    let ranks = anchors
        .iter()
        .map(|a| {
            a.as_ref().map(|(placement, node)| {
                let count = groups.entry((*placement as u8, node.as_str())).or_default();
                let rank = *count;
                *count += 1;
                rank
            })
        })
        .collect::<Vec<_>>();

    let phase = if cfg.orbit_period_secs > 0.0 && now_secs.is_finite() {
        TAU * (now_secs / cfg.orbit_period_secs)
    } else {
        0.0
    };

    travelers
        .iter()
        .zip(anchors.iter().zip(&ranks))
        .filter_map(|(t, (anchor, rank))| {
            let (placement, node) = anchor.as_ref()?;
            let rank = (*rank)?;
            let centre = layout.position(node)?;
            let size = groups
                .get(&(*placement as u8, node.as_str()))
                .copied()
                .unwrap_or(1);

            let (point, opacity) = match placement {
                MarkerPlacement::StartLine => (
                    centre + Vec2::new(-cfg.lineup_gap, slot(rank, size) * cfg.lineup_spacing),
                    1.0,
                ),
                MarkerPlacement::FinishLine => (
                    centre + Vec2::new(cfg.lineup_gap, slot(rank, size) * cfg.lineup_spacing),
                    1.0,
                ),
                MarkerPlacement::Parked => (centre, cfg.abandoned_opacity),
                MarkerPlacement::Orbit => {
                    let angle = phase + TAU * rank as f64 / size as f64;
                    (
                        centre + Vec2::new(angle.cos(), angle.sin()) * cfg.orbit_radius,
                        1.0,
                    )
                }
            };

            Some(Marker {
                traveler_id: t.id.clone(),
                display_name: t.display_name.clone(),
                color_index: t.color_index,
                placement: *placement,
                node_id: node.clone(),
                point,
                opacity,
            })
        })
        .collect()
}

fn anchor_of(layout: &Layout, t: &Traveler) -> Option<(MarkerPlacement, String)> {
    let graph = layout.graph();
    match t.status {
        TravelerStatus::NotStarted => {
            Some((MarkerPlacement::StartLine, graph.origin()?.id.clone()))
        }
        TravelerStatus::Finished => {
            let last = t
                .last_node()
                .and_then(|id| graph.node(id))
                .filter(|n| n.kind == NodeKind::Terminal);
            let terminal = match last {
                Some(n) => n,
                None => graph.node_at(*graph.terminal_indices().first()?),
            };
            Some((MarkerPlacement::FinishLine, terminal.id.clone()))
        }
        TravelerStatus::Abandoned => {
            let node = t.last_node().filter(|id| graph.contains(id))?;
            Some((MarkerPlacement::Parked, node.to_owned()))
        }
        TravelerStatus::InProgress => {
            let node = t.last_node().filter(|id| graph.contains(id))?;
            Some((MarkerPlacement::Orbit, node.to_owned()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/markers.rs"]
mod tests;
