//! Engine configuration, read from a RON file at startup

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::camera::CameraConfig;
use crate::rasterizer::{Real, RenderSettings, Scalar, ViewConfig, HEIGHT, WIDTH};

/// Default location of the config file, relative to the working directory
pub const CONFIG_PATH: &str = "assets/engine.ron";

/// Largest framebuffer edge, in pixels
pub const MAX_SCREEN: usize = 4096;
pub const MAX_WINDOW_SCALE: u32 = 16;
/// Largest view plane extent, in cells; keeps slopes inside the narrow fixed range
const MAX_PLANE: f32 = 64.0;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Framebuffer size in pixels
    pub screen_width: usize,
    pub screen_height: usize,
    /// Integer window scale applied by the presenter
    pub window_scale: u32,
    pub render: RenderSettings,
    pub view: ViewConfig,
    pub camera: CameraConfig,
    /// RON level file; the built-in maze is used when it can't be read
    pub level_path: String,
    /// Optional wall image; procedural bricks otherwise
    pub wall_texture: Option<String>,
    /// Optional feature image; procedural checkerboard otherwise
    pub feature_texture: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: WIDTH,
            screen_height: HEIGHT,
            window_scale: 3,
            render: RenderSettings::default(),
            view: ViewConfig::default(),
            camera: CameraConfig::default(),
            level_path: "assets/levels/classic.ron".to_string(),
            wall_texture: None,
            feature_texture: None,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load, or fall back to defaults with a warning
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded engine config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                warn!("Using default EngineConfig");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size {}x{} is empty",
                self.screen_width, self.screen_height
            )));
        }
        if self.render.low_resolution && (self.screen_width % 2 != 0 || self.screen_height % 2 != 0) {
            return Err(ConfigError::Invalid(
                "low_resolution needs an even screen width and height".to_string(),
            ));
        }
        if self.window_scale == 0 || self.window_scale > MAX_WINDOW_SCALE {
            return Err(ConfigError::Invalid(format!(
                "window_scale {} must be between 1 and {}",
                self.window_scale, MAX_WINDOW_SCALE
            )));
        }
        if self.screen_width > MAX_SCREEN || self.screen_height > MAX_SCREEN {
            return Err(ConfigError::Invalid(format!(
                "screen size {}x{} exceeds {}",
                self.screen_width, self.screen_height, MAX_SCREEN
            )));
        }

        let view = &self.view;
        let finite = [view.plane_width, view.plane_height, view.plane_distance, view.horizon]
            .iter()
            .all(|v| v.is_finite());
        if !finite || view.plane_width <= 0.0 || view.plane_height <= 0.0 || view.plane_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!("view plane {:?} must be positive", view)));
        }
        if view.plane_width > MAX_PLANE || view.plane_height > MAX_PLANE || view.plane_distance > MAX_PLANE {
            return Err(ConfigError::Invalid(format!("view plane {:?} exceeds {} cells", view, MAX_PLANE)));
        }
        if view.horizon < 0.0 || view.horizon > view.plane_height {
            return Err(ConfigError::Invalid(format!(
                "horizon {} must lie within the plane height {}",
                view.horizon, view.plane_height
            )));
        }

        // The renderer works in Real, where small values can round to zero
        let distance = Real::from_f32(view.plane_distance);
        let column_step = Real::from_f32(view.plane_width) / Real::from_int(self.screen_width as i32);
        let row_step = Real::from_f32(view.plane_height) / Real::from_int(self.screen_height as i32);
        if distance <= Real::ZERO {
            return Err(ConfigError::Invalid(format!(
                "plane_distance {} is below the engine's precision",
                view.plane_distance
            )));
        }
        if column_step <= Real::ZERO || row_step <= Real::ZERO {
            return Err(ConfigError::Invalid(format!(
                "view plane {}x{} is too small for a {}x{} screen at the engine's precision",
                view.plane_width, view.plane_height, self.screen_width, self.screen_height
            )));
        }

        self.camera.validate().map_err(ConfigError::Invalid)
    }
}
