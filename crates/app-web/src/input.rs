use glam::Vec2;

// Pointer helpers kept free of web-sys so they can be tested on the host.

/// WheelEvent.deltaMode values.
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

const LINE_HEIGHT_PX: f32 = 16.0;

/// Client coordinates to coordinates relative to the container's top-left corner.
#[inline]
pub fn client_to_local(client: Vec2, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client.x - rect_left, client.y - rect_top)
}

/// Wheel delta in pixels whatever unit the browser reported it in.
#[inline]
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, page_height: f32) -> f32 {
    let d = delta_y as f32;
    match delta_mode {
        DOM_DELTA_LINE => d * LINE_HEIGHT_PX,
        DOM_DELTA_PAGE => d * page_height.max(1.0),
        _ => d,
    }
}

/// Only the primary button (left mouse, touch, pen contact) orbits the camera.
#[inline]
pub fn is_orbit_button(button: i16) -> bool {
    button == 0
}
