//! Engine state: the maze, the self-driving camera and the renderer
//!
//! The outer loop calls [`Engine::new`] once, then [`Engine::update`] and
//! [`Engine::render`] once per tick.

use tracing::{info, warn};

use crate::camera::{CameraController, CameraPose, Tick};
use crate::config::EngineConfig;
use crate::rasterizer::{PixelSink, Texture, WallTextures};
use crate::scene::SceneRenderer;
use crate::world::{load_level, Facing, Level, LevelError, MazeGrid};

pub struct Engine {
    level_name: String,
    grid: MazeGrid,
    camera: CameraController,
    renderer: SceneRenderer,
    ticks: u64,
}

impl Engine {
    /// Build the grid, place the camera on the level's start cell and
    /// precompute the projection tables.
    pub fn new(config: &EngineConfig, level: &Level, textures: WallTextures) -> Result<Self, LevelError> {
        let grid = level.to_grid()?;
        let camera = CameraController::new(level.start, &config.camera);
        let renderer = SceneRenderer::new(
            &config.view,
            &config.render,
            config.screen_width,
            config.screen_height,
            textures,
        );

        info!(
            level = %level.name,
            width = grid.width(),
            height = grid.height(),
            start = ?level.start.cell,
            facing = ?level.start.facing,
            "engine ready"
        );

        Ok(Self {
            level_name: level.name.clone(),
            grid,
            camera,
            renderer,
            ticks: 0,
        })
    }

    /// Advance the camera by one tick
    pub fn update(&mut self) -> Tick {
        self.ticks += 1;
        self.camera.update(&self.grid)
    }

    /// Draw the current view. Does not change any engine state.
    pub fn render<S: PixelSink + ?Sized>(&self, sink: &mut S) {
        self.renderer.render(sink, &self.grid, &self.camera.pose());
    }

    pub fn pose(&self) -> CameraPose {
        self.camera.pose()
    }

    pub fn facing(&self) -> Facing {
        self.camera.facing()
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Load the configured level, falling back to the built-in maze
pub fn load_level_or_classic(path: &str) -> Level {
    match load_level(path) {
        Ok(level) => {
            info!("Loaded level '{}' from {}", level.name, path);
            level
        }
        Err(e) => {
            warn!("Failed to load level {}: {}", path, e);
            warn!("Using built-in classic maze");
            Level::classic()
        }
    }
}

/// Load the configured wall images, falling back to procedural textures
pub fn load_textures(config: &EngineConfig) -> WallTextures {
    let builtin = WallTextures::builtin();
    WallTextures {
        wall: load_texture_or(config.wall_texture.as_deref(), builtin.wall),
        feature: load_texture_or(config.feature_texture.as_deref(), builtin.feature),
    }
}

fn load_texture_or(path: Option<&str>, fallback: Texture) -> Texture {
    let Some(path) = path else {
        return fallback;
    };
    match Texture::from_file(path) {
        Ok(tex) => {
            info!("Loaded texture {}", path);
            tex
        }
        Err(e) => {
            warn!("Failed to load texture {}: {}", path, e);
            fallback
        }
    }
}
