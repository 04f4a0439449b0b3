//! maze3d: fixed-point first-person maze renderer
//!
//! A grid maze is ray cast one screen column at a time into a packed 15-bit
//! framebuffer while a wall-following camera tours it without input.
//! - Fixed-point geometry (8 or 16 fractional bits), or f32 with `float`
//! - DDA ray casting against per-cell wall flags
//! - Textured walls with flat floor and ceiling
//! - Reduced-resolution mode for slow targets

pub mod rasterizer;
pub mod world;
pub mod camera;
pub mod scene;
pub mod config;
pub mod app;

pub use app::Engine;
pub use config::EngineConfig;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
