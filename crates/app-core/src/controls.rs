use crate::camera::Camera;
use crate::constants::{ORBIT_DOLLY_STEP, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_ROTATE_SPEED};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const POLAR_EPS: f32 = 1e-6;

/// Drag-to-orbit and wheel-to-dolly around the camera target.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    drag_from: Option<Vec2>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate_speed: ORBIT_ROTATE_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            drag_from: None,
        }
    }
}

impl OrbitControls {
    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn begin_drag(&mut self, px: Vec2) {
        self.drag_from = Some(px);
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    /// Continue a drag to `px`. A full viewport height of travel is one turn.
    pub fn drag_to(&mut self, camera: &mut Camera, px: Vec2, viewport_height: f32) {
        let Some(from) = self.drag_from else {
            return;
        };
        let delta = (px - from) * self.rotate_speed;
        let h = viewport_height.max(1.0);
        self.rotate(camera, TAU * delta.x / h, TAU * delta.y / h);
        self.drag_from = Some(px);
    }

    /// Wheel input; positive `delta_y` (scrolling down) moves away.
    pub fn wheel(&self, camera: &mut Camera, delta_y: f32) {
        let scale = if delta_y < 0.0 {
            ORBIT_DOLLY_STEP
        } else if delta_y > 0.0 {
            1.0 / ORBIT_DOLLY_STEP
        } else {
            return;
        };
        let offset = camera.eye - camera.target;
        let radius = (offset.length() * scale).clamp(self.min_distance, self.max_distance);
        camera.eye = camera.target + offset.normalize_or_zero() * radius;
    }

    fn rotate(&self, camera: &mut Camera, left: f32, up: f32) {
        let offset = camera.eye - camera.target;
        let radius = offset.length();
        if radius <= 0.0 {
            return;
        }
        let theta = offset.x.atan2(offset.z) - left;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - up).clamp(POLAR_EPS, PI - POLAR_EPS);
        let sin_phi = phi.sin();
        camera.eye = camera.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_keeps_distance() {
        let mut cam = Camera::default();
        let mut c = OrbitControls::default();
        c.begin_drag(Vec2::new(100.0, 100.0));
        c.drag_to(&mut cam, Vec2::new(160.0, 130.0), 600.0);
        assert!((cam.eye.length() - 0.5).abs() < 1e-5);
        assert!(cam.eye.x < 0.0, "dragging right orbits the eye left");
    }

    #[test]
    fn full_height_drag_is_one_turn() {
        let mut cam = Camera::default();
        let start = cam.eye;
        let mut c = OrbitControls::default();
        c.begin_drag(Vec2::ZERO);
        c.drag_to(&mut cam, Vec2::new(600.0, 0.0), 600.0);
        assert!(cam.eye.distance(start) < 1e-4);
    }

    #[test]
    fn drag_without_begin_is_ignored() {
        let mut cam = Camera::default();
        let mut c = OrbitControls::default();
        c.drag_to(&mut cam, Vec2::new(50.0, 50.0), 600.0);
        assert_eq!(cam.eye, Camera::default().eye);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = Camera::default();
        let mut c = OrbitControls::default();
        c.begin_drag(Vec2::ZERO);
        c.drag_to(&mut cam, Vec2::new(0.0, -5000.0), 600.0);
        assert!(cam.eye.is_finite());
        // dragged far upwards: the eye sits just above the bottom pole
        assert!((cam.eye.y + 0.5).abs() < 1e-3);
    }

    #[test]
    fn wheel_dollies_and_clamps() {
        let mut cam = Camera::default();
        let c = OrbitControls::default();
        c.wheel(&mut cam, -1.0);
        assert!((cam.eye.length() - 0.475).abs() < 1e-6);
        c.wheel(&mut cam, 1.0);
        assert!((cam.eye.length() - 0.5).abs() < 1e-6);
        for _ in 0..500 {
            c.wheel(&mut cam, -1.0);
        }
        assert!((cam.eye.length() - ORBIT_MIN_DISTANCE).abs() < 1e-6);
    }
}
