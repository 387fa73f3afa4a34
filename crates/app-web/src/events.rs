use crate::dom;
use crate::frame::FrameContext;
use crate::input;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Registered DOM listeners. Kept (not `forget`-ed) so `dispose` can detach them.
#[derive(Default)]
pub struct InputWiring {
    listeners: Vec<Listener>,
}

impl InputWiring {
    fn listen<E, F>(&mut self, target: &web::EventTarget, kind: &'static str, mut handler: F)
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                handler(ev);
            }
        }) as Box<dyn FnMut(web::Event)>);
        if let Err(e) =
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        {
            log::error!("[input] failed to listen for {}: {:?}", kind, e);
            return;
        }
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
    }

    pub fn detach(&mut self) {
        for l in self.listeners.drain(..) {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
    }
}

/// Run `f` on the context if it is still alive.
fn with_ctx(weak: &Weak<RefCell<FrameContext>>, f: impl FnOnce(&mut FrameContext)) {
    if let Some(ctx) = weak.upgrade() {
        f(&mut ctx.borrow_mut());
    }
}

fn local_px(ev: &web::MouseEvent, container: &web::HtmlElement) -> Vec2 {
    let rect = container.get_bounding_client_rect();
    input::client_to_local(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        rect.left() as f32,
        rect.top() as f32,
    )
}

pub fn wire_input_handlers(frame_ctx: &Rc<RefCell<FrameContext>>) -> InputWiring {
    let mut wiring = InputWiring::default();
    let (canvas, container) = {
        let ctx = frame_ctx.borrow();
        (ctx.canvas.clone(), ctx.container.clone())
    };
    let Some(window) = web::window() else {
        log::error!("[input] no window; input disabled");
        return wiring;
    };
    let window_target: web::EventTarget = window.into();
    let canvas_target: web::EventTarget = canvas.clone().into();

    // resize: re-read the container, resize canvas and renderer
    {
        let weak = Rc::downgrade(frame_ctx);
        wiring.listen(&window_target, "resize", move |_: web::Event| {
            with_ctx(&weak, |ctx| {
                let viewport = dom::container_viewport(&ctx.container, &ctx.config);
                dom::sync_canvas_backing_size(&ctx.canvas, &viewport);
                ctx.sketch.resize(viewport);
            });
        });
    }

    // pointermove: orbit while dragging, raycast the plane for the light target
    {
        let weak = Rc::downgrade(frame_ctx);
        let container = container.clone();
        wiring.listen(&canvas_target, "pointermove", move |ev: web::PointerEvent| {
            let px = local_px(&ev, &container);
            with_ctx(&weak, |ctx| {
                if let Some(hit) = ctx.sketch.pointer_move(px) {
                    log::debug!("[input] light target {:.3},{:.3}", hit.x, hit.y);
                }
            });
        });
    }

    {
        let weak = Rc::downgrade(frame_ctx);
        let container = container.clone();
        let canvas = canvas.clone();
        wiring.listen(&canvas_target, "pointerdown", move |ev: web::PointerEvent| {
            if !input::is_orbit_button(ev.button()) {
                return;
            }
            let _ = canvas.set_pointer_capture(ev.pointer_id());
            let px = local_px(&ev, &container);
            with_ctx(&weak, |ctx| ctx.sketch.pointer_down(px));
        });
    }

    // released anywhere, including outside the canvas
    {
        let weak = Rc::downgrade(frame_ctx);
        wiring.listen(&window_target, "pointerup", move |_: web::PointerEvent| {
            with_ctx(&weak, |ctx| ctx.sketch.pointer_up());
        });
    }

    {
        let weak = Rc::downgrade(frame_ctx);
        let container = container.clone();
        wiring.listen(&canvas_target, "wheel", move |ev: web::WheelEvent| {
            ev.prevent_default();
            let dy = input::wheel_delta_px(
                ev.delta_y(),
                ev.delta_mode(),
                container.offset_height() as f32,
            );
            with_ctx(&weak, |ctx| ctx.sketch.wheel(dy));
        });
    }

    wiring
}
