//! Configuration system
//!
//! File-backed settings shared by the engine and games built on it. Formats
//! are picked from the file extension: `.toml` or `.ron`.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults when the file is absent
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot run
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Perspective projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_deg: 90.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Scene lighting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Number of point-light slots bound each frame
    pub max_point_lights: usize,
    /// Directional light elevation angle in degrees
    pub directional_alpha_deg: f32,
    /// Directional light azimuth angle in degrees
    pub directional_beta_deg: f32,
    /// Directional light colour
    pub directional_color: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            max_point_lights: 11,
            directional_alpha_deg: -60.0,
            directional_beta_deg: -120.0,
            directional_color: [0.1, 1.0, 1.0],
        }
    }
}

/// Camera placement used until (and in addition to) following an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye position
    pub eye: [f32; 3],
    /// Pitch in degrees
    pub elevation_deg: f32,
    /// Yaw in degrees
    pub angle_deg: f32,
    /// Eye offset from a followed entity
    pub follow_offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            elevation_deg: 0.0,
            angle_deg: -180.0,
            follow_offset: [0.0, 2.0, -8.0],
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target simulation passes per second
    pub fps_limit: f64,
    /// Projection settings
    pub projection: ProjectionConfig,
    /// Lighting settings
    pub lighting: LightingConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Colour the frame is cleared to
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps_limit: 60.0,
            projection: ProjectionConfig::default(),
            lighting: LightingConfig::default(),
            camera: CameraConfig::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Set the target frame rate
    pub fn with_fps_limit(mut self, fps_limit: f64) -> Self {
        self.fps_limit = fps_limit;
        self
    }

    /// Set the projection parameters
    pub fn with_projection(mut self, fov_deg: f32, near: f32, far: f32) -> Self {
        self.projection = ProjectionConfig { fov_deg, near, far };
        self
    }

    /// Set the number of point-light slots
    pub fn with_max_point_lights(mut self, count: usize) -> Self {
        self.lighting.max_point_lights = count;
        self
    }

    /// Milliseconds between simulation passes
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps_limit
    }

    /// Check values that would make the loop or pipeline meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps_limit.is_finite() && self.fps_limit > 0.0) {
            return Err(ConfigError::Invalid(format!("fps_limit must be positive, got {}", self.fps_limit)));
        }
        if self.lighting.max_point_lights == 0 {
            return Err(ConfigError::Invalid("max_point_lights must be at least 1".to_string()));
        }
        let projection = &self.projection;
        if !(projection.near > 0.0 && projection.far > projection.near) {
            return Err(ConfigError::Invalid(format!(
                "projection planes must satisfy 0 < near < far, got near={} far={}",
                projection.near, projection.far
            )));
        }
        if !(projection.fov_deg > 0.0 && projection.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!("fov_deg out of range: {}", projection.fov_deg)));
        }
        Ok(())
    }
}
