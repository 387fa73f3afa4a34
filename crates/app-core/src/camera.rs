//! Perspective camera and screen-space ray helpers.
//!
//! Platform-agnostic; the web and native front-ends feed pointer positions in
//! and get world-space rays back.

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_POSITION};
use crate::raycast::Ray;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: CAMERA_POSITION,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect from a viewport size; zero heights are treated as one.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width.max(1.0) / height.max(1.0);
    }

    /// World-space ray from the eye through normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, 0.5, 1.0);
        let through = p.truncate() / p.w;
        Ray {
            origin: self.eye,
            direction: (through - self.eye).normalize_or_zero(),
        }
    }
}

/// Pixel position inside a `width` x `height` viewport to NDC (y up).
#[inline]
pub fn pixel_to_ndc(px: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (px.x / width.max(1.0)) * 2.0 - 1.0,
        -(px.y / height.max(1.0)) * 2.0 + 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_ray_points_at_target() {
        let cam = Camera::default();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, CAMERA_POSITION);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(pixel_to_ndc(Vec2::ZERO, 200.0, 100.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(200.0, 100.0), 200.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(100.0, 50.0), 200.0, 100.0), Vec2::ZERO);
    }

    #[test]
    fn zero_viewport_keeps_finite_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport(0.0, 0.0);
        assert_eq!(cam.aspect, 1.0);
        assert!(cam.projection_matrix().is_finite());
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let mut cam = Camera::default();
        cam.set_viewport(1600.0, 900.0);
        let ray = cam.ray_from_ndc(Vec2::new(1.0, 0.0));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
    }
}
