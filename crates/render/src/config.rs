use crate::backend::GlVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Render system configuration: window, projection and context version.
///
/// Missing fields fall back to [`RenderConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Context version to try for after the base context is up.
    pub requested_version: GlVersion,
    /// Lowest version the system will run on.
    pub min_version: GlVersion,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            requested_version: GlVersion::new(3, 3),
            min_version: GlVersion::LEGACY,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&source)?;
        tracing::info!(path = %path.display(), "loaded render config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
