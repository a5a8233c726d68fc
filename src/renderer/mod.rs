//! WebGPU rendering module
//!
//! Every point (field stars, trail samples, heads) is drawn as an instanced
//! camera-facing quad in a single pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{STAR_SHADER, StarRenderer};
pub use shapes::{build_instances, camera_uniform};
pub use vertex::{CameraUniform, StarInstance};
