//! World module - grid maze, ray casting and navigation
//!
//! - Cell grid with deduplicated wall flags
//! - DDA ray casting against the grid
//! - Wall-following direction choice
//! - RON level files

mod maze;
mod level;
mod raycast;
mod solver;

pub use maze::*;
pub use level::*;
pub use raycast::*;
pub use solver::*;
