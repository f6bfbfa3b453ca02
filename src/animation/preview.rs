use std::collections::BTreeMap;

use crate::{
    animation::{
        ease::Ease,
        paths::{enumerate_paths, select_diverse_paths},
        timing::RevealTiming,
        waypoints::{WaypointPath, build_waypoints},
    },
    config::settings::AnimationConfig,
    foundation::{core::Point, math::unit_clamp},
    layout::engine::Layout,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
/// Where a preview is in its timeline.
pub enum PreviewPhase {
    /// The course is being drawn in.
    DrawIn {
        /// Runs 0..=1 over the draw-in duration.
        progress: f64,
    },
    /// The course is fully drawn and heroes race.
    Racing {
        /// Runs 0..=1 per loop and holds at 1 during the end-of-loop pause.
        progress: f64,
    },
}

/// One hero's state in a racing frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HeroSample {
    /// Palette slot, also the hero's rank.
    pub color_index: u32,
    /// Eased progress along the hero's path.
    pub progress: f64,
    /// Head position; `None` for an empty path.
    pub point: Option<Point>,
    /// Drawn prefix of the hero's path.
    pub trail: WaypointPath,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything a renderer needs for one preview frame.
pub struct PreviewFrame {
    /// Timeline position this frame was sampled at.
    pub phase: PreviewPhase,
    /// Draw progress per edge, parallel to [`Layout::edges`].
    pub edge_progress: Vec<f64>,
    /// Opacity per node id.
    pub node_opacity: BTreeMap<String, f64>,
    /// Empty during draw-in.
    pub heroes: Vec<HeroSample>,
}

/// Decorative animation for a course with no live participants: a synchronised draw-in
/// followed by a looping race of seeded, mutually dissimilar hero paths.
#[derive(Clone, Debug)]
pub struct PreviewAnimation {
    cfg: AnimationConfig,
    timing: RevealTiming,
    hero_nodes: Vec<Vec<String>>,
    heroes: Vec<WaypointPath>,
}

impl PreviewAnimation {
    /// Compute reveal timing and pick `cfg.hero_count` dissimilar hero paths.
    pub fn new(layout: &Layout, cfg: &AnimationConfig) -> Self {
        let timing = RevealTiming::compute(layout);
        let all = enumerate_paths(layout, cfg.max_enumerated_paths);
        let hero_nodes = select_diverse_paths(&all, cfg.hero_count, cfg.seed);
        let heroes = hero_nodes
            .iter()
            .map(|p| build_waypoints(layout, p))
            .collect();
        tracing::debug!(
            candidates = all.len(),
            heroes = hero_nodes.len(),
            "preview animation prepared"
        );
        Self {
            cfg: cfg.clone(),
            timing,
            hero_nodes,
            heroes,
        }
    }

    /// Draw-in schedule.
    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    /// Node ids of every hero path, in hero order.
    pub fn hero_paths(&self) -> &[Vec<String>] {
        &self.hero_nodes
    }

    /// Length of one race loop including the end-of-loop pause.
    pub fn loop_secs(&self) -> f64 {
        self.cfg.race_loop_secs + self.cfg.race_pause_secs
    }

    /// Seconds from the start until the first race loop completes.
    pub fn intro_secs(&self) -> f64 {
        self.cfg.draw_in_secs + self.loop_secs()
    }

    /// Phase at `elapsed_secs`; negative or non-finite input counts as the start.
    pub fn phase_at(&self, elapsed_secs: f64) -> PreviewPhase {
        let elapsed = if elapsed_secs.is_finite() {
            elapsed_secs.max(0.0)
        } else {
            0.0
        };
        if elapsed < self.cfg.draw_in_secs {
            return PreviewPhase::DrawIn {
                progress: unit_clamp(elapsed / self.cfg.draw_in_secs),
            };
        }
        let into_loop = (elapsed - self.cfg.draw_in_secs) % self.loop_secs();
        PreviewPhase::Racing {
            progress: unit_clamp(into_loop / self.cfg.race_loop_secs),
        }
    }

    /// Full frame state at `elapsed_secs`.
    pub fn sample(&self, elapsed_secs: f64) -> PreviewFrame {
        let phase = self.phase_at(elapsed_secs);
        let drawn = match phase {
            PreviewPhase::DrawIn { progress } => progress,
            PreviewPhase::Racing { .. } => 1.0,
        };

        let edge_progress = (0..self.timing.edges.len())
            .map(|i| self.timing.edge_progress(i, drawn))
            .collect();
        let node_opacity = self
            .timing
            .nodes
            .keys()
            .map(|id| (id.clone(), self.timing.node_opacity(id, drawn)))
            .collect();

        let heroes = match phase {
            PreviewPhase::DrawIn { .. } => Vec::new(),
            PreviewPhase::Racing { progress } => self.sample_heroes(progress),
        };

        PreviewFrame {
            phase,
            edge_progress,
            node_opacity,
            heroes,
        }
    }

    fn sample_heroes(&self, progress: f64) -> Vec<HeroSample> {
        let stagger = self.effective_stagger();
        self.heroes
            .iter()
            .enumerate()
            .map(|(k, path)| {
                let start = k as f64 * stagger;
                let local = unit_clamp((progress - start) / (1.0 - start));
                let eased = Ease::InOutCubic.apply(local);
                HeroSample {
                    color_index: k as u32,
                    progress: eased,
                    point: path.interpolate(eased),
                    trail: path.trail(eased),
                }
            })
            .collect()
    }

    /// Stagger shrunk so the last hero still gets a tenth of the loop to run.
    fn effective_stagger(&self) -> f64 {
        match self.heroes.len() {
            0 | 1 => 0.0,
            n => self.cfg.hero_stagger.min(0.9 / (n - 1) as f64),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preview.rs"]
mod tests;
