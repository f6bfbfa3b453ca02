//! coursemap turns a layered course graph into a metro-style map and animates travelers on it.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: topology JSON -> [`Graph`] (unknown kinds and dangling edges are dropped)
//! 2. **Lay out**: `Graph -> Layout` (layered x, two-pass barycenter y, 45° metro routes)
//! 3. **Animate**: reveal timing, hero paths and distance-based interpolation for previews
//! 4. **Follow**: live snapshots -> offset traveler lines, fog of war, markers, follow camera
//! 5. **Render**: any of the above -> [`Scene`] -> SVG or PNG
//!
//! Every engine step is a pure function of its inputs. Malformed input is filtered or
//! defaulted rather than reported; only text parsing, configuration validation and file output
//! return errors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod foundation;
mod graph;
mod layout;
mod live;
mod offset;
mod render;
mod visibility;

pub use animation::ease::Ease;
pub use animation::frame_loop::{CancelToken, FrameControl, FrameLoop, FrameTask};
pub use animation::paths::{enumerate_paths, select_diverse_paths};
pub use animation::preview::{HeroSample, PreviewAnimation, PreviewFrame, PreviewPhase};
pub use animation::timing::{EdgeTiming, RevealTiming};
pub use animation::waypoints::{Waypoint, WaypointPath, build_waypoints, interpolate};
pub use config::settings::{
    AnimationConfig, EngineConfig, LayoutConfig, MarkerConfig, NodeRadii, OffsetConfig,
    ViewportConfig, VisibilityConfig,
};
pub use foundation::core::{Fps, FrameIndex, Line, Point, Rect, Rgba8, Vec2, traveler_color};
pub use foundation::error::{CourseError, CourseResult};
pub use foundation::math::Rng64;
pub use graph::model::{Edge, Graph, Node, NodeKind, Passage};
pub use graph::parse::parse_graph;
pub use graph::search::{shortest_path, shortest_path_ids};
pub use layout::engine::{LaidOutNode, Layout, RoutedEdge, Traversal, compute_layout};
pub use layout::route::route_edge;
pub use live::controller::{LiveController, LiveFrame};
pub use live::markers::{Marker, MarkerPlacement, compute_markers};
pub use live::transient::{TransientMarker, TransientMarkers, TransientSample, transient_curve};
pub use live::traveler::{
    LiveSnapshot, RaceStatus, Traveler, TravelerStatus, VisitEntry, parse_snapshot_lines,
};
pub use live::viewport::{FollowViewport, full_extent, target_viewport};
pub use offset::traveler_paths::{
    EdgeKey, TravelerPath, capped_slot, compute_offset_paths, dedupe_consecutive, edge_usage,
    expand_visits, slot,
};
pub use render::raster::{rasterize, write_png};
pub use render::scene::{
    NodeShape, RenderStyle, Scene, SceneItem, course_scene, live_scene, preview_scene,
};
pub use render::svg::to_svg;
pub use visibility::fog::{EdgeVisibility, NodeVisibility, VisibilityMap, classify, discovered_from};
