use crate::constants::*;
use crate::curl::CurlVariant;
use crate::flow::FlowParams;

/// Everything the scene builder and driver read at construction time.
///
/// Front-ends normally take `SketchConfig::default()`; tests pin `seed` for
/// deterministic geometry.
#[derive(Clone, Debug)]
pub struct SketchConfig {
    /// `None` draws a fresh seed from the OS on every construction.
    pub seed: Option<u64>,
    pub tube_count: usize,
    pub seed_spread: f32,
    pub flow: FlowParams,
    pub tube_radius: f32,
    pub tubular_segments: usize,
    pub radial_segments: usize,
    pub max_pixel_ratio: f64,
    pub clear_color: [f64; 4],
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tube_count: TUBE_COUNT,
            seed_spread: SEED_SPREAD,
            flow: FlowParams::default(),
            tube_radius: TUBE_RADIUS,
            tubular_segments: TUBE_TUBULAR_SEGMENTS,
            radial_segments: TUBE_RADIAL_SEGMENTS,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            clear_color: CLEAR_COLOR,
        }
    }
}

impl SketchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_curl_variant(mut self, variant: CurlVariant) -> Self {
        self.flow.variant = variant;
        self
    }

    /// Device pixel ratio after applying the cap.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        if device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }
}
