use std::sync::Arc;

use anyhow::Context;
use curl_tubes_core::{
    FrameScheduler, GpuError, GpuRenderer, PlayState, Sketch, SketchConfig, Viewport,
};
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

const SEED_ENV: &str = "CURL_TUBES_SEED";
const LINE_HEIGHT_PX: f32 = 16.0;

/// Redraw requests stand in for requestAnimationFrame.
struct WindowScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    // Redraws cannot be withdrawn; a disposed sketch ignores the callback.
    fn cancel_frame(&mut self) {}
}

struct Running {
    window: Arc<Window>,
    sketch: Sketch<GpuRenderer<'static>>,
    scheduler: WindowScheduler,
    /// Cursor in logical pixels.
    cursor: Vec2,
    /// Whether occlusion (rather than the user) paused the loop.
    paused_by_occlusion: bool,
}

impl Running {
    fn new(window: Arc<Window>, config: &SketchConfig) -> anyhow::Result<Self> {
        let viewport = viewport_for(&window, config);
        let (w, h) = viewport.physical_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(GpuError::from)?;
        let renderer =
            pollster::block_on(GpuRenderer::new(&instance, surface, w, h, config.clear_color))?;

        let mut scheduler = WindowScheduler {
            window: Arc::clone(&window),
        };
        let mut sketch = Sketch::new(config, viewport, renderer);
        sketch.start(&mut scheduler);
        Ok(Self {
            window,
            sketch,
            scheduler,
            cursor: Vec2::ZERO,
            paused_by_occlusion: false,
        })
    }

    fn toggle_play(&mut self) {
        match self.sketch.state() {
            PlayState::Playing => self.sketch.stop(),
            PlayState::Stopped => self.sketch.play(&mut self.scheduler),
        }
        self.paused_by_occlusion = false;
    }

    fn set_occluded(&mut self, occluded: bool) {
        if occluded && self.sketch.state() == PlayState::Playing {
            self.sketch.stop();
            self.paused_by_occlusion = true;
        } else if !occluded && self.paused_by_occlusion {
            self.sketch.play(&mut self.scheduler);
            self.paused_by_occlusion = false;
        }
    }
}

/// Logical window size plus the capped scale factor.
fn viewport_for(window: &Window, config: &SketchConfig) -> Viewport {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f32>(scale);
    Viewport::new(logical.width, logical.height, config.pixel_ratio(scale))
}

/// Browser-style wheel delta: positive when scrolling towards the user.
fn wheel_delta_px(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

fn config_from_env() -> SketchConfig {
    let config = SketchConfig::default();
    match std::env::var(SEED_ENV) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(seed) => {
                log::info!("[scene] using {}={}", SEED_ENV, seed);
                config.with_seed(seed)
            }
            Err(e) => {
                log::warn!("[scene] ignoring {}={:?}: {}", SEED_ENV, raw, e);
                config
            }
        },
        Err(_) => config,
    }
}

struct App {
    config: SketchConfig,
    running: Option<Running>,
}

impl App {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(r) = &mut self.running {
            r.sketch.dispose(&mut r.scheduler);
        }
        self.running = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("Curl Tubes")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let result = event_loop
            .create_window(attrs)
            .context("create window")
            .and_then(|w| Running::new(Arc::new(w), &self.config));
        match result {
            Ok(r) => {
                log::info!("[loop] started");
                self.running = Some(r);
            }
            Err(e) => {
                log::error!("[gpu] init failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(r) = &mut self.running else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let viewport = viewport_for(&r.window, &self.config);
                r.sketch.resize(viewport);
            }
            WindowEvent::Occluded(occluded) => r.set_occluded(occluded),
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(r.window.scale_factor());
                r.cursor = Vec2::new(logical.x, logical.y);
                r.sketch.pointer_move(r.cursor);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => r.sketch.pointer_down(r.cursor),
                ElementState::Released => r.sketch.pointer_up(),
            },
            WindowEvent::MouseWheel { delta, .. } => r.sketch.wheel(wheel_delta_px(delta)),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Space),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => r.toggle_play(),
            WindowEvent::RedrawRequested => {
                r.sketch.on_animation_frame(&mut r.scheduler);
                if let Some(GpuError::Surface(wgpu::SurfaceError::OutOfMemory)) =
                    r.sketch.take_render_error()
                {
                    log::error!("[gpu] out of memory; exiting");
                    self.shutdown(event_loop);
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new().context("event loop")?;
    let mut app = App {
        config: config_from_env(),
        running: None,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}
