//! Application configuration, loaded from YAML.
//!
//! Every field has a default, so a config file only needs the values it wants
//! to change. Command-line flags are applied on top by the binaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Rubix".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit angle per pixel of left-button drag.
    pub orbit_degrees_per_pixel: f32,
    /// Radius change per pixel of right-button drag.
    pub zoom_units_per_pixel: f32,
    /// Arrow-key pan speed in world units per second.
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_degrees_per_pixel: 0.25,
            zoom_units_per_pixel: 0.05,
            pan_speed: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Whole-cube spin increment applied each tick while an axis is active.
    pub spin_step_degrees: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            spin_step_degrees: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on a single fence wait. Exceeding it is fatal.
    pub fence_timeout_ms: u64,
    pub vsync: bool,
    /// Sticker atlas PNG. A procedural atlas is used when absent.
    pub atlas_path: Option<PathBuf>,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fence_timeout_ms: 5000,
            vsync: true,
            atlas_path: None,
            // Light steel blue.
            clear_color: [0.690_196, 0.768_627, 0.870_588, 1.0],
        }
    }
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.camera.orbit_degrees_per_pixel <= 0.0
            || self.camera.zoom_units_per_pixel <= 0.0
            || self.camera.pan_speed <= 0.0
        {
            return Err(ConfigError::Invalid(
                "camera rates must be positive".into(),
            ));
        }
        if !self.scene.spin_step_degrees.is_finite() {
            return Err(ConfigError::Invalid("spin step must be finite".into()));
        }
        if self.render.fence_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "fence timeout must be at least 1 ms".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("scene:\n  spin_step_degrees: 2.0\n").unwrap();
        assert_eq!(config.scene.spin_step_degrees, 2.0);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.render.fence_timeout_ms, 5000);
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = AppConfig::default();
        config.render.vsync = false;
        config.render.atlas_path = Some(PathBuf::from("textures/atlas.png"));
        let text = config.to_yaml_string().unwrap();
        let parsed = AppConfig::from_yaml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_zero_window() {
        let err = AppConfig::from_yaml_str("window:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = AppConfig::from_yaml_str("render:\n  fence_timeout_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "camera:\n  pan_speed: 4.0").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.camera.pan_speed, 4.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/rubix.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
