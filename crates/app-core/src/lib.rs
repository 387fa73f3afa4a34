pub mod camera;
pub mod config;
pub mod constants;
pub mod controls;
pub mod curl;
pub mod field;
pub mod flow;
pub mod geometry;
pub mod light;
pub mod raycast;
pub mod scene;
pub mod sketch;
pub mod spline;

#[cfg(feature = "gpu")]
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;

// Shaders bundled as string constants
pub static MAIN_WGSL: &str = include_str!("../shaders/main.wgsl");
pub static TUBES_WGSL: &str = include_str!("../shaders/tubes.wgsl");
pub static BASIC_WGSL: &str = include_str!("../shaders/basic.wgsl");

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use curl::{curl, curl_with, CurlVariant};
pub use field::NoiseField;
pub use flow::{FlowCurve, FlowParams};
pub use light::ElasticLight;
pub use scene::*;
pub use sketch::*;

#[cfg(feature = "gpu")]
pub use error::GpuError;
#[cfg(feature = "gpu")]
pub use gpu::GpuRenderer;
