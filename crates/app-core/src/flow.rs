use crate::constants::{CURVE_SCALE, CURVE_STEPS, CURVE_STEP_GROWTH, CURVE_STEP_START};
use crate::curl::{curl_with, CurlVariant};
use crate::field::NoiseField;
use glam::DVec3;

/// Integration parameters for a single streamline.
#[derive(Clone, Copy, Debug)]
pub struct FlowParams {
    /// Positions are divided by this before the field is sampled.
    pub scale: f64,
    pub steps: usize,
    pub variant: CurlVariant,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            scale: CURVE_SCALE,
            steps: CURVE_STEPS,
            variant: CurlVariant::Central,
        }
    }
}

/// Polyline approximating a streamline of the curl field.
///
/// Always `steps + 1` points long and never modified once generated.
#[derive(Clone, Debug)]
pub struct FlowCurve {
    points: Vec<DVec3>,
}

impl FlowCurve {
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> DVec3 {
        self.points[0]
    }
}

/// Step length used for integration step `i` of `steps`.
///
/// Grows linearly so curves start tight and spread outward.
#[inline]
pub fn step_length(i: usize, steps: usize) -> f64 {
    CURVE_STEP_START + CURVE_STEP_GROWTH * (i as f64 / steps.max(1) as f64)
}

/// Advect `seed` through the curl field for `params.steps` explicit Euler steps.
///
/// There is no early exit: curves that wander far from the origin keep going.
pub fn generate(field: &NoiseField, seed: DVec3, params: FlowParams) -> FlowCurve {
    let mut points = Vec::with_capacity(params.steps + 1);
    points.push(seed);
    let mut current = seed;
    for i in 0..params.steps {
        let q = current / params.scale;
        let v = curl_with(field, q.x, q.y, q.z, params.variant);
        current += v * step_length(i, params.steps);
        points.push(current);
    }
    FlowCurve { points }
}
