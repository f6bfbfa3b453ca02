use std::collections::HashMap;

use crate::{
    animation::ease::Ease,
    foundation::{core::Point, math::{lerp, unit_clamp}},
    layout::engine::Layout,
    live::traveler::Traveler,
};

/// Peak scale reached at the end of the pop-in.
const PEAK_SCALE: f64 = 1.4;
const POP_END: f64 = 0.15;
const SETTLE_END: f64 = 0.35;
const FADE_START: f64 = 0.6;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A short-lived overlay spawned by a death.
pub struct TransientMarker {
    /// Traveler whose death spawned it.
    pub traveler_id: String,
    /// Palette slot of that traveler.
    pub color_index: u32,
    /// Node the death happened at.
    pub node_id: String,
    /// Center of that node.
    pub point: Point,
    /// Spawn time in controller seconds.
    pub spawned_at: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A [`TransientMarker`] evaluated at one instant.
pub struct TransientSample {
    /// Traveler whose death spawned it.
    pub traveler_id: String,
    /// Palette slot of that traveler.
    pub color_index: u32,
    /// Node the death happened at.
    pub node_id: String,
    /// Center of that node.
    pub point: Point,
    /// Size multiplier from [`transient_curve`].
    pub scale: f64,
    /// Opacity from [`transient_curve`].
    pub opacity: f64,
}

/// `(scale, opacity)` at fraction `t` of the display duration.
///
/// Pops in past the peak and lands on it, settles back to 1, holds, then fades out over the
/// last 40%.
pub fn transient_curve(t: f64) -> (f64, f64) {
    let t = unit_clamp(t);
    let scale = if t < POP_END {
        PEAK_SCALE * Ease::OutBack.apply(t / POP_END)
    } else if t < SETTLE_END {
        lerp(
            PEAK_SCALE,
            1.0,
            Ease::InOutQuad.apply((t - POP_END) / (SETTLE_END - POP_END)),
        )
    } else {
        1.0
    };
    let opacity = if t < FADE_START {
        1.0
    } else {
        1.0 - (t - FADE_START) / (1.0 - FADE_START)
    };
    (scale, opacity.max(0.0))
}

/// Death-counter diffing across snapshots.
///
/// The first time a traveler is seen only its counter is recorded; later increases spawn one
/// marker at the traveler's node. Decreases reset the baseline silently.
#[derive(Clone, Debug)]
pub struct TransientMarkers {
    duration_secs: f64,
    baseline: HashMap<String, u32>,
    active: Vec<TransientMarker>,
}

impl TransientMarkers {
    /// Tracker whose markers live for `duration_secs`.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            baseline: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Diff `travelers` against the previous observation. Returns how many markers spawned.
    pub fn observe(&mut self, layout: &Layout, travelers: &[Traveler], now_secs: f64) -> usize {
        let mut spawned = 0;
        self.baseline.retain(|id, _| travelers.iter().any(|t| &t.id == id));
        for t in travelers {
            let previous = self.baseline.insert(t.id.clone(), t.deaths);
            let Some(previous) = previous else {
                continue;
            };
            if t.deaths <= previous {
                continue;
            }
            let Some((node_id, point)) = t
                .last_node()
                .and_then(|id| Some((id.to_owned(), layout.position(id)?)))
            else {
                continue;
            };
            tracing::debug!(traveler = %t.id, deaths = t.deaths, node = %node_id, "death");
            self.active.push(TransientMarker {
                traveler_id: t.id.clone(),
                color_index: t.color_index,
                node_id,
                point,
                spawned_at: now_secs,
            });
            spawned += 1;
        }
        self.prune(now_secs);
        spawned
    }

    /// Drop markers whose display time is over.
    pub fn prune(&mut self, now_secs: f64) {
        let duration = self.duration_secs;
        self.active.retain(|m| now_secs - m.spawned_at < duration);
    }

    /// Markers still on screen, oldest first.
    pub fn active(&self) -> &[TransientMarker] {
        &self.active
    }

    /// Number of active markers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// No active markers.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Prune, then sample every live marker's curve.
    pub fn sample(&mut self, now_secs: f64) -> Vec<TransientSample> {
        self.prune(now_secs);
        self.active
            .iter()
            .map(|m| {
                let t = if self.duration_secs > 0.0 {
                    (now_secs - m.spawned_at) / self.duration_secs
                } else {
                    1.0
                };
                let (scale, opacity) = transient_curve(t);
                TransientSample {
                    traveler_id: m.traveler_id.clone(),
                    color_index: m.color_index,
                    node_id: m.node_id.clone(),
                    point: m.point,
                    scale,
                    opacity,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/transient.rs"]
mod tests;
