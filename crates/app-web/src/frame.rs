use curl_tubes_core::{FrameScheduler, GpuRenderer, Sketch, SketchConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// requestAnimationFrame-backed scheduler. Holds the tick closure and the id
/// of the pending request so it can be cancelled.
#[derive(Default)]
pub struct RafScheduler {
    callback: Option<Closure<dyn FnMut()>>,
    handle: Option<i32>,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let (Some(window), Some(cb)) = (web::window(), self.callback.as_ref()) else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.handle = Some(id),
            Err(e) => log::error!("[loop] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let (Some(window), Some(id)) = (web::window(), self.handle.take()) {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

impl RafScheduler {
    /// Drop the tick closure. Any later request becomes a no-op.
    pub fn release(&mut self) {
        self.cancel_frame();
        self.callback = None;
    }
}

/// Everything the animation-frame and event callbacks share.
pub struct FrameContext {
    pub sketch: Sketch<GpuRenderer<'static>>,
    pub scheduler: RafScheduler,
    pub config: SketchConfig,
    pub canvas: web::HtmlCanvasElement,
    pub container: web::HtmlElement,
}

impl FrameContext {
    pub fn tick(&mut self) {
        self.scheduler.handle = None;
        let Self {
            sketch, scheduler, ..
        } = self;
        sketch.on_animation_frame(scheduler);
    }

    pub fn play(&mut self) {
        let Self {
            sketch, scheduler, ..
        } = self;
        sketch.play(scheduler);
    }

    pub fn dispose(&mut self) {
        let Self {
            sketch, scheduler, ..
        } = self;
        sketch.dispose(scheduler);
        scheduler.release();
    }
}

/// Install the tick closure and request the first frame.
///
/// The closure only holds a weak reference, so dropping the last strong
/// handle to the context ends the loop.
pub fn start_loop(frame_ctx: &Rc<RefCell<FrameContext>>) {
    let weak: Weak<RefCell<FrameContext>> = Rc::downgrade(frame_ctx);
    let tick = Closure::wrap(Box::new(move || {
        if let Some(ctx) = weak.upgrade() {
            ctx.borrow_mut().tick();
        }
    }) as Box<dyn FnMut()>);

    let mut ctx = frame_ctx.borrow_mut();
    ctx.scheduler.callback = Some(tick);
    let FrameContext {
        sketch, scheduler, ..
    } = &mut *ctx;
    sketch.start(scheduler);
}
