#![cfg(target_arch = "wasm32")]
use curl_tubes_core::{GpuRenderer, Sketch, SketchConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod input;

use frame::FrameContext;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("curl-tubes-web loaded");
    Ok(())
}

/// Handle returned to JavaScript. Owns the sketch, its canvas and listeners.
#[wasm_bindgen]
pub struct CurlTubes {
    ctx: Rc<RefCell<FrameContext>>,
    wiring: events::InputWiring,
}

#[wasm_bindgen]
impl CurlTubes {
    /// Pause the loop after the current frame.
    pub fn stop(&self) {
        self.ctx.borrow_mut().sketch.stop();
    }

    /// Resume the loop; renders a frame immediately.
    pub fn play(&self) {
        self.ctx.borrow_mut().play();
    }

    /// Cancel the pending frame, detach listeners and remove the canvas.
    pub fn dispose(&mut self) {
        self.wiring.detach();
        let mut ctx = self.ctx.borrow_mut();
        ctx.dispose();
        dom::remove_canvas(&ctx.canvas);
    }

    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.ctx.borrow().sketch.frame_count()
    }
}

impl Drop for CurlTubes {
    fn drop(&mut self) {
        self.wiring.detach();
        if let Ok(mut ctx) = self.ctx.try_borrow_mut() {
            ctx.dispose();
        }
    }
}

/// Mount the sketch into `container` and start animating.
///
/// `seed` fixes the random tube seeds and noise permutation; omit it for a
/// fresh arrangement on every load.
#[wasm_bindgen(js_name = createSketch)]
pub async fn create_sketch(
    container: web::HtmlElement,
    seed: Option<f64>,
) -> Result<CurlTubes, JsValue> {
    let mut config = SketchConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed as u64);
    }
    init(container, config)
        .await
        .map_err(|e| JsValue::from(js_sys::Error::new(&format!("{:#}", e))))
}

async fn init(container: web::HtmlElement, config: SketchConfig) -> anyhow::Result<CurlTubes> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::create_canvas(&document, &container)?;
    let viewport = dom::container_viewport(&container, &config);
    dom::sync_canvas_backing_size(&canvas, &viewport);
    log::info!(
        "[resize] {}x{} css, dpr {}",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    let instance = wgpu::Instance::default();
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(curl_tubes_core::GpuError::from)?;
    let (w, h) = viewport.physical_size();
    let renderer = GpuRenderer::new(&instance, surface, w, h, config.clear_color).await?;

    let sketch = Sketch::new(&config, viewport, renderer);
    let ctx = Rc::new(RefCell::new(FrameContext {
        sketch,
        scheduler: frame::RafScheduler::default(),
        config,
        canvas,
        container,
    }));
    frame::start_loop(&ctx);
    let wiring = events::wire_input_handlers(&ctx);
    log::info!("[loop] started");
    Ok(CurlTubes { ctx, wiring })
}
