use glam::Vec3;

// Shared scene/interaction tuning constants used by both web and native frontends.

// Curl noise
pub const CURL_EPSILON: f64 = 1e-4; // central-difference step for partial derivatives

// Flow curves
pub const CURVE_SCALE: f64 = 0.75; // positions are divided by this before sampling the field
pub const CURVE_STEPS: usize = 500;
pub const CURVE_STEP_START: f64 = 0.0003; // step length at the first integration step
pub const CURVE_STEP_GROWTH: f64 = 0.0002; // added linearly across the run (ends just under 0.0005)

// Scene layout
pub const TUBE_COUNT: usize = 300;
pub const SEED_SPREAD: f32 = 0.45; // unit cube centred at origin, scaled by this
pub const TUBE_RADIUS: f32 = 0.0025;
pub const TUBE_TUBULAR_SEGMENTS: usize = 300;
pub const TUBE_RADIAL_SEGMENTS: usize = 4;

pub const PLANE_SIZE: f32 = 100.0; // raycast plane width/height, centred at origin on z = 0

pub const MARKER_RADIUS: f32 = 0.005;
pub const MARKER_SEGMENTS: usize = 20;
pub const MARKER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Elastic light
pub const LIGHT_STIFFNESS: f32 = 0.15;
pub const LIGHT_DAMPING: f32 = 0.8;

// Camera
pub const CAMERA_FOV_DEG: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 0.5);

// Orbit controls
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_DOLLY_STEP: f32 = 0.95; // per wheel notch
pub const ORBIT_MIN_DISTANCE: f32 = 0.01;
pub const ORBIT_MAX_DISTANCE: f32 = 100.0;

// Renderer
pub const MAX_PIXEL_RATIO: f64 = 2.0;
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
pub const MSAA_SAMPLES: u32 = 4;
