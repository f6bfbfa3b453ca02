use crate::{
    foundation::error::{CourseError, CourseResult},
    graph::model::NodeKind,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// All tunable constants consumed by the engine.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid configuration.
/// Values are checked by [`EngineConfig::validate`] rather than at deserialization time.
pub struct EngineConfig {
    /// Node placement and edge routing.
    pub layout: LayoutConfig,
    /// Draw-in and hero race loop timing.
    pub animation: AnimationConfig,
    /// Parallel offset of traveler polylines.
    pub offset: OffsetConfig,
    /// Live traveler markers and transient overlays.
    pub markers: MarkerConfig,
    /// Following camera.
    pub viewport: ViewportConfig,
    /// Fog-of-war rendering.
    pub visibility: VisibilityConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry constants for [`crate::compute_layout`].
pub struct LayoutConfig {
    /// X of layer 0.
    pub margin_left: f64,
    /// Minimum Y after vertical normalisation.
    pub margin_top: f64,
    /// Horizontal footprint reserved for a node.
    pub node_footprint: f64,
    /// Gap between consecutive layers before weight is added.
    pub min_layer_gap: f64,
    /// Pixels of extra gap per unit of node weight in the previous layer.
    pub weight_scale: f64,
    /// Vertical distance between nodes of the same layer.
    pub node_spacing: f64,
    /// Lower bound on layout width (also the width of an empty layout).
    pub min_width: f64,
    /// Lower bound on layout height (also the height of an empty layout).
    pub min_height: f64,
    /// Per-kind node radii used by renderers.
    pub radii: NodeRadii,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_left: 60.0,
            margin_top: 60.0,
            node_footprint: 24.0,
            min_layer_gap: 56.0,
            weight_scale: 10.0,
            node_spacing: 72.0,
            min_width: 0.0,
            min_height: 0.0,
            radii: NodeRadii::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Node radius per kind.
pub struct NodeRadii {
    /// Origin node radius.
    pub origin: f64,
    /// Generic waypoint radius.
    pub waypoint: f64,
    /// Boss arena radius.
    pub boss_arena: f64,
    /// Major boss radius.
    pub major_boss: f64,
    /// Legacy / multi-room radius.
    pub legacy_dungeon: f64,
    /// Terminal node radius.
    pub terminal: f64,
}

impl Default for NodeRadii {
    fn default() -> Self {
        Self {
            origin: 12.0,
            waypoint: 8.0,
            boss_arena: 10.0,
            major_boss: 12.0,
            legacy_dungeon: 11.0,
            terminal: 14.0,
        }
    }
}

impl NodeRadii {
    /// Radius for a node kind.
    pub fn for_kind(&self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Origin => self.origin,
            NodeKind::Waypoint => self.waypoint,
            NodeKind::BossArena => self.boss_arena,
            NodeKind::MajorBoss => self.major_boss,
            NodeKind::LegacyDungeon => self.legacy_dungeon,
            NodeKind::Terminal => self.terminal,
        }
    }

    fn all(&self) -> [(&'static str, f64); 6] {
        [
            ("origin", self.origin),
            ("waypoint", self.waypoint),
            ("boss_arena", self.boss_arena),
            ("major_boss", self.major_boss),
            ("legacy_dungeon", self.legacy_dungeon),
            ("terminal", self.terminal),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Timing of the decorative preview animation.
pub struct AnimationConfig {
    /// Duration of the draw-in phase.
    pub draw_in_secs: f64,
    /// Duration of one hero race loop.
    pub race_loop_secs: f64,
    /// Pause at the end of every race loop before heroes restart.
    pub race_pause_secs: f64,
    /// Number of decorative hero racers.
    pub hero_count: usize,
    /// Start delay between consecutive heroes, as a fraction of the race loop.
    pub hero_stagger: f64,
    /// Upper bound on enumerated origin-to-terminal paths.
    pub max_enumerated_paths: usize,
    /// Seed for the diverse hero path choice.
    pub seed: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            draw_in_secs: 4.0,
            race_loop_secs: 8.0,
            race_pause_secs: 1.0,
            hero_count: 3,
            hero_stagger: 0.12,
            max_enumerated_paths: 4096,
            seed: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Parallel-offset constants for shared edges.
pub struct OffsetConfig {
    /// Perpendicular distance between adjacent slots.
    pub spacing: f64,
    /// Travelers beyond this many on one edge collapse to the centre slot.
    pub max_slots: usize,
    /// Fraction of a straight edge kept pinched toward each endpoint.
    pub pinch_fraction: f64,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            max_slots: 6,
            pinch_fraction: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Live marker placement and transient overlay timing.
pub struct MarkerConfig {
    /// Orbit radius around the occupied node centre.
    pub orbit_radius: f64,
    /// Seconds for one full orbit.
    pub orbit_period_secs: f64,
    /// Vertical distance between lined-up markers.
    pub lineup_spacing: f64,
    /// Horizontal distance between a node centre and its line-up column.
    pub lineup_gap: f64,
    /// Opacity of abandoned travelers.
    pub abandoned_opacity: f64,
    /// Display duration of transient markers.
    pub transient_secs: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 14.0,
            orbit_period_secs: 6.0,
            lineup_spacing: 14.0,
            lineup_gap: 28.0,
            abandoned_opacity: 0.35,
            transient_secs: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Following camera constants.
pub struct ViewportConfig {
    /// Exponential approach rate per second.
    pub smoothing_rate: f64,
    /// Minimum number of layer pitches visible horizontally.
    pub min_visible_layers: usize,
    /// Horizontal padding kept around the leader.
    pub padding: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            smoothing_rate: 3.0,
            min_visible_layers: 4,
            padding: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Fog-of-war opacities.
pub struct VisibilityConfig {
    /// Opacity of visible edges with at least one undiscovered endpoint.
    pub dim_edge_opacity: f64,
    /// Opacity of adjacent (bordering) nodes.
    pub adjacent_node_opacity: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            dim_edge_opacity: 0.35,
            adjacent_node_opacity: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json_str(s: &str) -> CourseResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| CourseError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate ranges of every section.
    pub fn validate(&self) -> CourseResult<()> {
        let l = &self.layout;
        for (name, value) in [("margin_left", l.margin_left), ("margin_top", l.margin_top)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CourseError::validation(format!(
                    "layout.{name} must be finite and > 0",
                )));
            }
        }
        for (name, value) in [
            ("node_footprint", l.node_footprint),
            ("min_layer_gap", l.min_layer_gap),
            ("weight_scale", l.weight_scale),
            ("min_width", l.min_width),
            ("min_height", l.min_height),
        ] {
            non_negative("layout", name, value)?;
        }
        if !l.node_spacing.is_finite() || l.node_spacing <= 0.0 {
            return Err(CourseError::validation(
                "layout.node_spacing must be finite and > 0",
            ));
        }
        for (name, value) in l.radii.all() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CourseError::validation(format!(
                    "layout.radii.{name} must be finite and > 0",
                )));
            }
        }

        let a = &self.animation;
        for (name, value) in [
            ("draw_in_secs", a.draw_in_secs),
            ("race_loop_secs", a.race_loop_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CourseError::validation(format!(
                    "animation.{name} must be finite and > 0",
                )));
            }
        }
        non_negative("animation", "race_pause_secs", a.race_pause_secs)?;
        if !a.hero_stagger.is_finite() || !(0.0..1.0).contains(&a.hero_stagger) {
            return Err(CourseError::validation(
                "animation.hero_stagger must be in [0, 1)",
            ));
        }
        if a.max_enumerated_paths == 0 {
            return Err(CourseError::validation(
                "animation.max_enumerated_paths must be > 0",
            ));
        }

        let o = &self.offset;
        non_negative("offset", "spacing", o.spacing)?;
        if o.max_slots == 0 {
            return Err(CourseError::validation("offset.max_slots must be > 0"));
        }
        if !o.pinch_fraction.is_finite() || !(0.0..0.5).contains(&o.pinch_fraction) {
            return Err(CourseError::validation(
                "offset.pinch_fraction must be in [0, 0.5)",
            ));
        }

        let m = &self.markers;
        non_negative("markers", "orbit_radius", m.orbit_radius)?;
        non_negative("markers", "lineup_spacing", m.lineup_spacing)?;
        non_negative("markers", "lineup_gap", m.lineup_gap)?;
        for (name, value) in [
            ("orbit_period_secs", m.orbit_period_secs),
            ("transient_secs", m.transient_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CourseError::validation(format!(
                    "markers.{name} must be finite and > 0",
                )));
            }
        }
        unit_range("markers", "abandoned_opacity", m.abandoned_opacity)?;

        let v = &self.viewport;
        if !v.smoothing_rate.is_finite() || v.smoothing_rate <= 0.0 {
            return Err(CourseError::validation(
                "viewport.smoothing_rate must be finite and > 0",
            ));
        }
        if v.min_visible_layers == 0 {
            return Err(CourseError::validation(
                "viewport.min_visible_layers must be > 0",
            ));
        }
        non_negative("viewport", "padding", v.padding)?;

        unit_range(
            "visibility",
            "dim_edge_opacity",
            self.visibility.dim_edge_opacity,
        )?;
        unit_range(
            "visibility",
            "adjacent_node_opacity",
            self.visibility.adjacent_node_opacity,
        )?;

        Ok(())
    }
}

fn non_negative(section: &str, name: &str, value: f64) -> CourseResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CourseError::validation(format!(
            "{section}.{name} must be finite and >= 0",
        )));
    }
    Ok(())
}

fn unit_range(section: &str, name: &str, value: f64) -> CourseResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CourseError::validation(format!(
            "{section}.{name} must be in [0, 1]",
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
