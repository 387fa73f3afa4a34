use curl_tubes_core::{SketchConfig, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Append a fresh canvas filling `container`.
pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("not a canvas: {:?}", e))?;
    let style = canvas.style();
    let _ = style.set_property("display", "block");
    let _ = style.set_property("touch-action", "none");
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

/// Container layout size and the capped device pixel ratio.
pub fn container_viewport(container: &web::HtmlElement, config: &SketchConfig) -> Viewport {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    Viewport::new(
        container.offset_width() as f32,
        container.offset_height() as f32,
        config.pixel_ratio(dpr),
    )
}

/// Match the canvas CSS size to the container and its backing store to the
/// physical size (never zero).
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: &Viewport) {
    let (w_px, h_px) = viewport.physical_size();
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", viewport.width));
    let _ = style.set_property("height", &format!("{}px", viewport.height));
}

pub fn remove_canvas(canvas: &web::HtmlCanvasElement) {
    canvas.remove();
}
