use std::sync::Arc;

use crate::{
    animation::frame_loop::{FrameControl, FrameTask},
    config::settings::EngineConfig,
    foundation::core::Rect,
    layout::engine::Layout,
    live::{
        markers::{Marker, compute_markers},
        transient::{TransientMarkers, TransientSample},
        traveler::LiveSnapshot,
        viewport::{FollowViewport, target_viewport},
    },
    offset::traveler_paths::{TravelerPath, compute_offset_paths},
    render::scene::{RenderStyle, Scene, live_scene},
    visibility::fog::{VisibilityMap, classify, discovered_from},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Derived state for one live frame.
pub struct LiveFrame {
    /// One marker per started traveler.
    pub markers: Vec<Marker>,
    /// Death markers still animating.
    pub transients: Vec<TransientSample>,
    /// Smoothed camera window.
    pub viewport: Rect,
    /// Offset trail per traveler.
    pub paths: Vec<TravelerPath>,
}

/// Composition root for live race rendering.
///
/// Snapshots replace the previous one wholesale. Offset paths and visibility are recomputed on
/// every [`LiveController::update`]; markers, transients and the camera advance per frame.
#[derive(Debug)]
pub struct LiveController {
    layout: Arc<Layout>,
    cfg: EngineConfig,
    style: RenderStyle,
    observer: Option<String>,
    snapshot: LiveSnapshot,
    transients: TransientMarkers,
    camera: FollowViewport,
    paths: Vec<TravelerPath>,
    visibility: Option<VisibilityMap>,
    last_frame_at: Option<f64>,
    latest: Option<LiveFrame>,
}

impl LiveController {
    /// Controller with an empty snapshot and no observer.
    pub fn new(layout: Arc<Layout>, cfg: EngineConfig) -> Self {
        let style = RenderStyle {
            radii: cfg.layout.radii,
            ..RenderStyle::default()
        };
        Self {
            transients: TransientMarkers::new(cfg.markers.transient_secs),
            camera: FollowViewport::new(&cfg.viewport),
            layout,
            cfg,
            style,
            observer: None,
            snapshot: LiveSnapshot::default(),
            paths: Vec::new(),
            visibility: None,
            last_frame_at: None,
            latest: None,
        }
    }

    /// Fog the map to what `traveler_id` has discovered.
    pub fn with_observer(mut self, traveler_id: impl Into<String>) -> Self {
        self.observer = Some(traveler_id.into());
        self.refresh_visibility();
        self
    }

    /// Replace the default render style.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Shared course layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Most recent snapshot.
    pub fn snapshot(&self) -> &LiveSnapshot {
        &self.snapshot
    }

    /// Offset paths from the last update.
    pub fn paths(&self) -> &[TravelerPath] {
        &self.paths
    }

    /// Fog classification; `None` without an observer.
    pub fn visibility(&self) -> Option<&VisibilityMap> {
        self.visibility.as_ref()
    }

    /// The most recent frame produced by [`FrameTask::frame`].
    pub fn latest(&self) -> Option<&LiveFrame> {
        self.latest.as_ref()
    }

    /// Replace the current snapshot and recompute derived views.
    pub fn update(&mut self, snapshot: LiveSnapshot, now_secs: f64) {
        let spawned = self
            .transients
            .observe(&self.layout, &snapshot.travelers, now_secs);
        self.paths = compute_offset_paths(&self.layout, &snapshot.travelers, &self.cfg.offset);
        self.snapshot = snapshot;
        self.refresh_visibility();
        tracing::debug!(
            travelers = self.snapshot.travelers.len(),
            spawned,
            "live snapshot applied"
        );
    }

    fn refresh_visibility(&mut self) {
        self.visibility = self.observer.as_deref().map(|id| {
            let discovered = self
                .snapshot
                .traveler(id)
                .map(discovered_from)
                .unwrap_or_default();
            classify(self.layout.graph(), &discovered, &self.cfg.visibility)
        });
    }

    /// Advance per-frame state to `now_secs`.
    pub fn frame(&mut self, now_secs: f64) -> LiveFrame {
        let dt = self.last_frame_at.map_or(0.0, |t| now_secs - t);
        self.last_frame_at = Some(now_secs);

        let target = target_viewport(&self.layout, &self.snapshot, &self.cfg.viewport);
        let viewport = self.camera.advance(target, dt);

        LiveFrame {
            markers: compute_markers(
                &self.layout,
                &self.snapshot.travelers,
                now_secs,
                &self.cfg.markers,
            ),
            transients: self.transients.sample(now_secs),
            viewport,
            paths: self.paths.clone(),
        }
    }

    /// Advance to `now_secs` and build the frame's scene.
    pub fn scene(&mut self, now_secs: f64) -> Scene {
        let frame = self.frame(now_secs);
        let scene = live_scene(&self.layout, &frame, self.visibility.as_ref(), &self.style);
        self.latest = Some(frame);
        scene
    }
}

impl FrameTask for LiveController {
    fn frame(&mut self, now_secs: f64) -> FrameControl {
        let frame = LiveController::frame(self, now_secs);
        self.latest = Some(frame);
        FrameControl::Continue
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/controller.rs"]
mod tests;
