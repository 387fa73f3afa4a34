//! Frame driver: owns the scenes, camera, light follower and frame clock, and
//! decides what each animation frame renders.
//!
//! The driver never talks to a window or a GPU directly. Front-ends hand it a
//! [`RenderBackend`] (wgpu in practice, a recorder in tests) and a
//! [`FrameScheduler`] (requestAnimationFrame or `Window::request_redraw`).

use crate::camera::{pixel_to_ndc, Camera};
use crate::config::SketchConfig;
use crate::controls::OrbitControls;
use crate::light::ElasticLight;
use crate::scene::{SceneLayer, SceneSet};
use glam::{Vec2, Vec3};

/// One step of the per-frame composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    /// Clear colour and depth.
    Clear,
    /// Clear depth only; colour from earlier passes is kept.
    ClearDepth,
    Render(SceneLayer),
}

/// Raycast plane first, then a depth clear so it can never occlude the tubes,
/// then the main scene as the visible top layer.
pub const FRAME_COMMANDS: [RenderCommand; 4] = [
    RenderCommand::Clear,
    RenderCommand::Render(SceneLayer::Raycast),
    RenderCommand::ClearDepth,
    RenderCommand::Render(SceneLayer::Main),
];

/// Everything a backend needs to draw one frame.
pub struct Frame<'a> {
    pub commands: &'a [RenderCommand],
    pub scenes: &'a SceneSet,
    pub camera: &'a Camera,
}

pub trait RenderBackend {
    type Error: std::fmt::Display;

    /// Receive the immutable geometry once, right after the scenes are built.
    fn upload(&mut self, scenes: &SceneSet);
    /// Output size in physical pixels, never zero.
    fn set_size(&mut self, width: u32, height: u32);
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// Host-side per-frame callback mechanism.
pub trait FrameScheduler {
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Stopped,
}

/// Frame counter fed to the shaders as `uTime`. One unit per rendered frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    frames: f64,
}

impl FrameClock {
    pub fn tick(&mut self) -> f64 {
        self.frames += 1.0;
        self.frames
    }

    pub fn frames(&self) -> f64 {
        self.frames
    }
}

/// Container size in CSS/logical pixels plus the (capped) device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio,
        }
    }

    /// Backing-store size; each side is at least one pixel.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width as f64 * self.pixel_ratio).round() as u32;
        let h = (self.height as f64 * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

pub struct Sketch<B: RenderBackend> {
    backend: B,
    scenes: SceneSet,
    camera: Camera,
    controls: OrbitControls,
    light: ElasticLight,
    clock: FrameClock,
    state: PlayState,
    viewport: Viewport,
    frame_pending: bool,
    disposed: bool,
    render_error: Option<B::Error>,
}

impl<B: RenderBackend> Sketch<B> {
    /// Build the scenes, upload them and size the output. Starts `Playing`;
    /// call [`Sketch::start`] to request the first frame.
    pub fn new(config: &SketchConfig, viewport: Viewport, mut backend: B) -> Self {
        let scenes = SceneSet::build(config);
        backend.upload(&scenes);

        let mut camera = Camera::default();
        camera.set_viewport(viewport.width, viewport.height);
        let (w, h) = viewport.physical_size();
        backend.set_size(w, h);

        Self {
            backend,
            scenes,
            camera,
            controls: OrbitControls::default(),
            light: ElasticLight::default(),
            clock: FrameClock::default(),
            state: PlayState::Playing,
            viewport,
            frame_pending: false,
            disposed: false,
            render_error: None,
        }
    }

    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        self.request_frame(scheduler);
    }

    /// Body of the animation-frame callback. Returns whether a frame was drawn.
    pub fn on_animation_frame(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        self.frame_pending = false;
        if self.state == PlayState::Stopped || self.disposed {
            return false;
        }
        self.render_frame();
        self.request_frame(scheduler);
        true
    }

    /// Pause. The pending callback, if any, becomes a no-op.
    pub fn stop(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Stopped;
            log::info!("[loop] stopped at frame {}", self.clock.frames());
        }
    }

    /// Resume and draw one frame right away. No-op while already playing.
    pub fn play(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.state == PlayState::Playing || self.disposed {
            return;
        }
        self.state = PlayState::Playing;
        log::info!("[loop] playing from frame {}", self.clock.frames());
        self.render_frame();
        self.request_frame(scheduler);
    }

    /// Cancel the pending frame and refuse to render again.
    pub fn dispose(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.disposed {
            return;
        }
        if self.frame_pending {
            scheduler.cancel_frame();
            self.frame_pending = false;
        }
        self.state = PlayState::Stopped;
        self.disposed = true;
        log::info!("[loop] disposed after {} frames", self.clock.frames());
    }

    /// Pointer moved to `px` (container pixels). Returns the plane hit, if any.
    ///
    /// On a miss the light target and marker keep their previous values.
    pub fn pointer_move(&mut self, px: Vec2) -> Option<Vec3> {
        if self.controls.is_dragging() {
            self.controls
                .drag_to(&mut self.camera, px, self.viewport.height);
        }
        let ndc = pixel_to_ndc(px, self.viewport.width, self.viewport.height);
        let ray = self.camera.ray_from_ndc(ndc);
        let hit = self.scenes.plane.intersect(&ray)?;
        self.light.set_target(hit.truncate());
        self.scenes.set_marker_position(hit);
        Some(hit)
    }

    pub fn pointer_down(&mut self, px: Vec2) {
        self.controls.begin_drag(px);
    }

    pub fn pointer_up(&mut self) {
        self.controls.end_drag();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.wheel(&mut self.camera, delta_y);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport.width, viewport.height);
        let (w, h) = viewport.physical_size();
        self.backend.set_size(w, h);
        log::info!(
            "[resize] {}x{} css, {}x{} px",
            viewport.width,
            viewport.height,
            w,
            h
        );
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn frame_count(&self) -> f64 {
        self.clock.frames()
    }

    pub fn light(&self) -> &ElasticLight {
        &self.light
    }

    pub fn scenes(&self) -> &SceneSet {
        &self.scenes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Most recent failed draw since the last call. The loop keeps running;
    /// shells decide whether an error is fatal.
    pub fn take_render_error(&mut self) -> Option<B::Error> {
        self.render_error.take()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn request_frame(&mut self, scheduler: &mut impl FrameScheduler) {
        if !self.frame_pending {
            scheduler.request_frame();
            self.frame_pending = true;
        }
    }

    fn render_frame(&mut self) {
        let smoothed = self.light.step();
        let mut marker = self.scenes.marker_position();
        marker.x = smoothed.x;
        marker.y = smoothed.y;
        self.scenes.set_marker_position(marker);
        self.scenes.materials.set_light(marker);

        let time = self.clock.tick();
        self.scenes.materials.set_time(time as f32);

        let frame = Frame {
            commands: &FRAME_COMMANDS,
            scenes: &self.scenes,
            camera: &self.camera,
        };
        if let Err(e) = self.backend.draw(&frame) {
            log::error!("[loop] render error: {}", e);
            self.render_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_never_zero() {
        assert_eq!(Viewport::new(0.0, 0.0, 2.0).physical_size(), (1, 1));
        assert_eq!(Viewport::new(800.0, 600.0, 2.0).physical_size(), (1600, 1200));
        assert_eq!(Viewport::new(-5.0, 10.0, 1.0).physical_size(), (1, 10));
    }

    #[test]
    fn clock_counts_whole_frames() {
        let mut c = FrameClock::default();
        assert_eq!(c.tick(), 1.0);
        assert_eq!(c.tick(), 2.0);
        assert_eq!(c.frames(), 2.0);
    }

    #[test]
    fn composite_order() {
        assert_eq!(FRAME_COMMANDS[0], RenderCommand::Clear);
        assert_eq!(FRAME_COMMANDS[3], RenderCommand::Render(SceneLayer::Main));
        let raycast = FRAME_COMMANDS
            .iter()
            .position(|c| *c == RenderCommand::Render(SceneLayer::Raycast));
        let depth = FRAME_COMMANDS
            .iter()
            .position(|c| *c == RenderCommand::ClearDepth);
        assert!(raycast < depth);
    }
}
