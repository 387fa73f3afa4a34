use crate::constants::{LIGHT_DAMPING, LIGHT_STIFFNESS};
use glam::Vec2;

/// Spring-damped follower for the pointer-driven light.
///
/// One `step` per animation frame; the filter is not normalised to frame
/// time, so it runs faster on high-refresh displays.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElasticLight {
    target: Vec2,
    position: Vec2,
    velocity: Vec2,
}

impl ElasticLight {
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overwrite the raw target. Whole-vector assignment, never partial.
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn step(&mut self) -> Vec2 {
        let pull = (self.target - self.position) * LIGHT_STIFFNESS;
        self.velocity += pull;
        self.velocity *= LIGHT_DAMPING;
        self.position += self.velocity;
        self.position
    }
}
