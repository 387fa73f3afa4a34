// Host-side tests for pure input functions.
// The web crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn client_coordinates_are_made_container_relative() {
    let p = client_to_local(Vec2::new(150.0, 90.0), 50.0, 40.0);
    assert_eq!(p, Vec2::new(100.0, 50.0));
}

#[test]
fn container_at_origin_is_identity() {
    let p = client_to_local(Vec2::new(12.5, 7.0), 0.0, 0.0);
    assert_eq!(p, Vec2::new(12.5, 7.0));
}

#[test]
fn wheel_pixels_pass_through() {
    assert_eq!(wheel_delta_px(-53.0, DOM_DELTA_PIXEL, 600.0), -53.0);
}

#[test]
fn wheel_lines_and_pages_scale_to_pixels() {
    assert_eq!(wheel_delta_px(3.0, DOM_DELTA_LINE, 600.0), 48.0);
    assert_eq!(wheel_delta_px(-1.0, DOM_DELTA_PAGE, 600.0), -600.0);
    // collapsed container still produces a usable sign
    assert_eq!(wheel_delta_px(1.0, DOM_DELTA_PAGE, 0.0), 1.0);
}

#[test]
fn only_primary_button_orbits() {
    assert!(is_orbit_button(0));
    assert!(!is_orbit_button(1));
    assert!(!is_orbit_button(2));
}
