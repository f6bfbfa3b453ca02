use crate::{
    config::settings::ViewportConfig,
    foundation::{
        core::Rect,
        math::{exp_smoothing_factor, lerp},
    },
    layout::engine::Layout,
    live::traveler::{LiveSnapshot, RaceStatus, TravelerStatus},
};

/// The whole layout.
pub fn full_extent(layout: &Layout) -> Rect {
    Rect::new(0.0, 0.0, layout.width, layout.height)
}

/// Camera window the follow viewport should settle on.
///
/// Finished races show the full extent. Before the start, or while nobody is running, the window
/// sits on the origin. Otherwise it is centred on the mean x of the in-progress travelers and
/// shifted right when needed so the leader plus padding stays inside. Windows always span the
/// full height, cover at least `min_visible_layers` layer pitches and never leave the extent.
pub fn target_viewport(layout: &Layout, snapshot: &LiveSnapshot, cfg: &ViewportConfig) -> Rect {
    let full = full_extent(layout);
    if snapshot.race_status == RaceStatus::Finished || layout.is_empty() {
        return full;
    }

    let width = (cfg.min_visible_layers as f64 * layout.layer_pitch()).min(full.width());
    if width <= 0.0 {
        return full;
    }

    let xs = if snapshot.race_status == RaceStatus::Running {
        snapshot
            .travelers
            .iter()
            .filter(|t| t.status == TravelerStatus::InProgress)
            .filter_map(|t| {
                t.current_node
                    .as_deref()
                    .and_then(|id| layout.position(id))
                    .map(|p| p.x)
                    .or_else(|| layout.x_of_layer(t.current_layer))
            })
            .collect::<Vec<_>>()
    } else {
        Vec::new()
    };

    let mut x0 = match xs.as_slice() {
        [] => {
            let origin_x = layout.origin().map_or(0.0, |o| o.pos.x);
            origin_x - width / 2.0
        }
        _ => {
            let centre = xs.iter().sum::<f64>() / xs.len() as f64;
            let leader = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let x0 = centre - width / 2.0;
            let reach = leader + cfg.padding;
            if reach > x0 + width { reach - width } else { x0 }
        }
    };
    x0 = x0.clamp(0.0, (full.width() - width).max(0.0));

    Rect::new(x0, 0.0, x0 + width, full.height())
}

/// Exponentially smoothed camera that eases toward a moving target.
#[derive(Clone, Copy, Debug)]
pub struct FollowViewport {
    rate: f64,
    current: Option<Rect>,
}

impl FollowViewport {
    /// Camera with no position yet.
    pub fn new(cfg: &ViewportConfig) -> Self {
        Self {
            rate: cfg.smoothing_rate,
            current: None,
        }
    }

    /// Window after the last `advance`.
    pub fn current(&self) -> Option<Rect> {
        self.current
    }

    /// Move `dt_secs` toward `target`. The first call snaps.
    pub fn advance(&mut self, target: Rect, dt_secs: f64) -> Rect {
        let next = match self.current {
            None => target,
            Some(cur) => {
                let f = exp_smoothing_factor(self.rate, dt_secs);
                Rect::new(
                    lerp(cur.x0, target.x0, f),
                    lerp(cur.y0, target.y0, f),
                    lerp(cur.x1, target.x1, f),
                    lerp(cur.y1, target.y1, f),
                )
            }
        };
        self.current = Some(next);
        next
    }

    /// Forget the position so the next `advance` snaps.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/viewport.rs"]
mod tests;
