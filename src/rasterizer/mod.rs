//! Fixed-point software rasterizer primitives
//!
//! - Deterministic scalar type (fixed or float, picked at build time)
//! - Binary angles with a lookup-table sine
//! - Packed 15-bit color, textures and a framebuffer sink
//! - Per-row projection slopes

mod fixed;
mod math;
mod types;
mod render;

pub use fixed::*;
pub use math::*;
pub use types::*;
pub use render::*;

/// Screen dimensions of the handheld target
pub const WIDTH: usize = 240;
pub const HEIGHT: usize = 160;
