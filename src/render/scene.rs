use crate::{
    animation::{preview::PreviewFrame, waypoints::WaypointPath},
    config::settings::NodeRadii,
    foundation::core::{Point, Rect, Rgba8, Vec2, traveler_color},
    graph::model::NodeKind,
    layout::engine::Layout,
    live::{controller::LiveFrame, markers::MarkerPlacement},
    visibility::fog::{NodeVisibility, VisibilityMap},
};

/// Outline drawn for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    /// Plain waypoint.
    Circle,
    /// Boss arena.
    Square,
    /// Major boss.
    Diamond,
    /// Legacy dungeon.
    Hexagon,
    /// Course origin.
    DoubleCircle,
    /// Terminal node.
    Star,
    /// Fogged node: identity withheld.
    Unknown,
    /// Death overlay.
    Cross,
}

impl NodeKind {
    /// Outline used when a node of this kind is drawn unfogged.
    pub fn shape(self) -> NodeShape {
        match self {
            Self::Origin => NodeShape::DoubleCircle,
            Self::Waypoint => NodeShape::Circle,
            Self::BossArena => NodeShape::Square,
            Self::MajorBoss => NodeShape::Diamond,
            Self::LegacyDungeon => NodeShape::Hexagon,
            Self::Terminal => NodeShape::Star,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// A single immediate-mode draw item. Items are drawn in order.
pub enum SceneItem {
    /// Open stroked polyline with round joins.
    Polyline {
        /// Vertices in layout coordinates.
        points: Vec<Point>,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in layout units.
        width: f64,
        /// Multiplier applied on top of `color`'s alpha.
        opacity: f64,
    },
    /// Course node outline.
    Node {
        /// Node center.
        center: Point,
        /// Outer radius.
        radius: f64,
        /// Outline shape.
        shape: NodeShape,
        /// Interior color.
        fill: Rgba8,
        /// Outline color.
        stroke: Rgba8,
        /// Multiplier applied to both colors.
        opacity: f64,
    },
    /// Text label centered on its anchor.
    Label {
        /// Baseline center of the text.
        anchor: Point,
        /// Label text.
        text: String,
        /// Font size in layout units.
        size: f64,
        /// Text color.
        color: Rgba8,
        /// Multiplier applied on top of `color`'s alpha.
        opacity: f64,
    },
    /// Filled traveler or death marker.
    Marker {
        /// Marker center.
        center: Point,
        /// Marker radius.
        radius: f64,
        /// Fill shape.
        shape: NodeShape,
        /// Fill color.
        color: Rgba8,
        /// Multiplier applied on top of `color`'s alpha.
        opacity: f64,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Backend-agnostic vector scene for one frame.
pub struct Scene {
    /// Output width in layout units.
    pub width: f64,
    /// Output height in layout units.
    pub height: f64,
    /// Visible window in layout coordinates.
    pub view_box: Rect,
    /// Clear color.
    pub background: Rgba8,
    /// Draw list, back to front.
    pub items: Vec<SceneItem>,
}

impl Scene {
    fn new(layout: &Layout, style: &RenderStyle) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            view_box: Rect::new(0.0, 0.0, layout.width, layout.height),
            background: style.background,
            items: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Colors and sizes shared by every scene builder.
pub struct RenderStyle {
    /// Clear color.
    pub background: Rgba8,
    /// Course edge color.
    pub edge_color: Rgba8,
    /// Course edge stroke width.
    pub edge_width: f64,
    /// Node interior.
    pub node_fill: Rgba8,
    /// Node outline.
    pub node_stroke: Rgba8,
    /// Label text color.
    pub label_color: Rgba8,
    /// Label font size.
    pub label_size: f64,
    /// Draw node names under discovered nodes.
    pub show_labels: bool,
    /// Traveler trail stroke width.
    pub trail_width: f64,
    /// Traveler marker radius.
    pub marker_radius: f64,
    /// Node radius per kind.
    pub radii: NodeRadii,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0x16, 0x18, 0x1d),
            edge_color: Rgba8::rgb(0x8b, 0x90, 0x99),
            edge_width: 4.0,
            node_fill: Rgba8::rgb(0x22, 0x25, 0x2c),
            node_stroke: Rgba8::rgb(0xe8, 0xe6, 0xe3),
            label_color: Rgba8::rgb(0xd8, 0xd6, 0xd0),
            label_size: 11.0,
            show_labels: true,
            trail_width: 3.0,
            marker_radius: 5.0,
            radii: NodeRadii::default(),
        }
    }
}

/// Static course map, optionally fogged for one observer.
///
/// With a visibility map, hidden nodes and edges are left out, and adjacent nodes are drawn as
/// unlabeled unknown markers.
pub fn course_scene(
    layout: &Layout,
    visibility: Option<&VisibilityMap>,
    style: &RenderStyle,
) -> Scene {
    let mut scene = Scene::new(layout, style);
    push_edges(&mut scene, layout, style, |i| {
        let e = &layout.edges[i];
        let opacity = match visibility {
            Some(v) => v.edge_opacity(&e.from, &e.to)?,
            None => 1.0,
        };
        Some((1.0, opacity))
    });
    push_nodes(&mut scene, layout, style, |id| match visibility {
        Some(v) => match v.get(id) {
            NodeVisibility::Discovered => Some((1.0, false)),
            NodeVisibility::Adjacent => Some((v.node_opacity(id), true)),
            NodeVisibility::Hidden => None,
        },
        None => Some((1.0, false)),
    });
    scene
}

/// One frame of the decorative preview: partially drawn edges, fading nodes, hero trails.
pub fn preview_scene(layout: &Layout, frame: &PreviewFrame, style: &RenderStyle) -> Scene {
    let mut scene = Scene::new(layout, style);
    push_edges(&mut scene, layout, style, |i| {
        let progress = frame.edge_progress.get(i).copied().unwrap_or(0.0);
        (progress > 0.0).then_some((progress, 1.0))
    });
    push_nodes(&mut scene, layout, style, |id| {
        let opacity = frame.node_opacity.get(id).copied().unwrap_or(0.0);
        (opacity > 0.0).then_some((opacity, false))
    });
    for hero in &frame.heroes {
        let color = traveler_color(hero.color_index);
        push_trail(&mut scene, &hero.trail, color, style.trail_width);
        if let Some(center) = hero.point {
            scene.items.push(SceneItem::Marker {
                center,
                radius: style.marker_radius,
                shape: NodeShape::Circle,
                color,
                opacity: 1.0,
            });
        }
    }
    scene
}

/// Live race frame: course, per-traveler offset trails, markers and death overlays, framed by
/// the follow viewport.
///
/// With a visibility map, trail hops touching a hidden node are cut and markers or overlays
/// anchored on hidden nodes are left out, so other travelers never reveal fogged topology.
pub fn live_scene(
    layout: &Layout,
    frame: &LiveFrame,
    visibility: Option<&VisibilityMap>,
    style: &RenderStyle,
) -> Scene {
    let mut scene = course_scene(layout, visibility, style);
    scene.view_box = frame.viewport;
    let shown = |id: &str| visibility.is_none_or(|v| v.is_visible(id));

    for tp in &frame.paths {
        let color = traveler_color(tp.color_index);
        let strokes = match visibility {
            Some(v) => visible_strokes(&tp.path, v),
            None => tp.path.strokes(),
        };
        push_strokes(&mut scene, strokes, color, style.trail_width);
    }
    for m in frame.markers.iter().filter(|m| shown(&m.node_id)) {
        let color = traveler_color(m.color_index);
        scene.items.push(SceneItem::Marker {
            center: m.point,
            radius: style.marker_radius,
            shape: NodeShape::Circle,
            color,
            opacity: m.opacity,
        });
        if style.show_labels && m.placement != MarkerPlacement::Orbit {
            scene.items.push(SceneItem::Label {
                anchor: m.point + Vec2::new(style.marker_radius * 1.6, style.label_size * 0.35),
                text: m.display_name.clone(),
                size: style.label_size * 0.9,
                color,
                opacity: m.opacity,
            });
        }
    }
    for t in frame.transients.iter().filter(|t| shown(&t.node_id)) {
        scene.items.push(SceneItem::Marker {
            center: t.point,
            radius: style.marker_radius * 1.5 * t.scale,
            shape: NodeShape::Cross,
            color: traveler_color(t.color_index),
            opacity: t.opacity,
        });
    }
    scene
}

/// Strokes of `path` restricted to hops whose two end nodes are both visible.
///
/// Vertices between node centres belong to the hop they sit on. A trailing partial hop is
/// dropped because its destination is not known.
pub(crate) fn visible_strokes(path: &WaypointPath, visibility: &VisibilityMap) -> Vec<Vec<Point>> {
    let mut out = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut pending: Vec<Point> = Vec::new();
    let mut prev_visible = false;

    for w in &path.waypoints {
        if w.jump {
            out.push(std::mem::take(&mut current));
            pending.clear();
        }
        let Some(id) = &w.node else {
            pending.push(w.point);
            continue;
        };
        let visible = visibility.is_visible(id);
        if visible && prev_visible && !current.is_empty() {
            current.append(&mut pending);
            current.push(w.point);
        } else {
            out.push(std::mem::take(&mut current));
            if visible {
                current.push(w.point);
            }
        }
        pending.clear();
        prev_visible = visible;
    }
    out.push(current);
    out.retain(|s| s.len() >= 2);
    out
}

/// `reveal(i)` returns `(drawn fraction, opacity)` or `None` to skip edge `i`.
fn push_edges(
    scene: &mut Scene,
    layout: &Layout,
    style: &RenderStyle,
    reveal: impl Fn(usize) -> Option<(f64, f64)>,
) {
    for (i, edge) in layout.edges.iter().enumerate() {
        let Some((progress, opacity)) = reveal(i) else {
            continue;
        };
        let points = partial_polyline(&edge.points(), progress);
        if points.len() < 2 {
            continue;
        }
        scene.items.push(SceneItem::Polyline {
            points,
            color: style.edge_color,
            width: style.edge_width,
            opacity,
        });
    }
}

/// `reveal(id)` returns `(opacity, fogged)` or `None` to skip the node.
fn push_nodes(
    scene: &mut Scene,
    layout: &Layout,
    style: &RenderStyle,
    reveal: impl Fn(&str) -> Option<(f64, bool)>,
) {
    let mut labels = Vec::new();
    for n in &layout.nodes {
        let Some((opacity, fogged)) = reveal(&n.node.id) else {
            continue;
        };
        let radius = style.radii.for_kind(n.node.kind);
        scene.items.push(SceneItem::Node {
            center: n.pos,
            radius,
            shape: if fogged {
                NodeShape::Unknown
            } else {
                n.node.kind.shape()
            },
            fill: style.node_fill,
            stroke: style.node_stroke,
            opacity,
        });
        if style.show_labels && !fogged {
            labels.push(SceneItem::Label {
                anchor: n.pos + Vec2::new(0.0, radius + style.label_size + 2.0),
                text: n.node.display_name.clone(),
                size: style.label_size,
                color: style.label_color,
                opacity,
            });
        }
    }
    scene.items.extend(labels);
}

fn push_trail(scene: &mut Scene, path: &WaypointPath, color: Rgba8, width: f64) {
    push_strokes(scene, path.strokes(), color, width);
}

fn push_strokes(scene: &mut Scene, strokes: Vec<Vec<Point>>, color: Rgba8, width: f64) {
    for stroke in strokes {
        if stroke.len() < 2 {
            continue;
        }
        scene.items.push(SceneItem::Polyline {
            points: stroke,
            color,
            width,
            opacity: 0.9,
        });
    }
}

/// Prefix of `points` covering `progress` of its length.
pub(crate) fn partial_polyline(points: &[Point], progress: f64) -> Vec<Point> {
    if progress >= 1.0 {
        return points.to_vec();
    }
    let mut path = WaypointPath::default();
    for &p in points {
        path.push(p, None, false);
    }
    path.trail(progress)
        .waypoints
        .into_iter()
        .map(|w| w.point)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
