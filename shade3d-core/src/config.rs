//! Startup configuration and fixed scene constants
//!
//! A [`SceneConfig`] is resolved once at startup (TOML file, then command
//! line overrides) and is read-only afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::geometry::DepthKey;
use crate::shading::ShadeMapping;

pub const TARGET_FPS: u32 = 60;
pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 1000.0;
pub const FOV_DEGREES: f64 = 90.0;

/// Distance the mesh is pushed along +Z, in front of the camera.
pub const CAMERA_OFFSET: f64 = 8.0;

/// The camera never moves from the origin.
pub const CAMERA_POSITION: [f64; 3] = [0.0, 0.0, 0.0];

/// Direction of the single directional light, before normalization.
pub const LIGHT_DIRECTION: [f64; 3] = [0.0, 0.0, -1.0];

/// Output size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height over width, as used by the projection matrix.
    pub fn aspect_ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000, 1000)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub viewport: Viewport,
    /// OBJ model to render; the built-in unit cube is used when unset.
    pub model: Option<PathBuf>,
    pub depth_key: DepthKey,
    pub shade_mapping: ShadeMapping,
}

impl SceneConfig {
    /// Load a config from a TOML file. Missing fields take their defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.viewport, Viewport::new(1000, 1000));
        assert_eq!(config.model, None);
        assert_eq!(config.depth_key, DepthKey::Legacy);
        assert_eq!(config.shade_mapping, ShadeMapping::Wrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SceneConfig::from_toml_str(
            r#"
            model = "ship.obj"
            depth_key = "centroid"
            shade_mapping = "clamp"

            [viewport]
            width = 640
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport, Viewport::new(640, 1000));
        assert_eq!(config.model, Some(PathBuf::from("ship.obj")));
        assert_eq!(config.depth_key, DepthKey::Centroid);
        assert_eq!(config.shade_mapping, ShadeMapping::Clamp);
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let err = SceneConfig::from_toml_str("[viewport]\nheight = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidViewport {
                width: 1000,
                height: 0
            }
        ));
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(matches!(
            SceneConfig::from_toml_str("depth_key = \"median\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shade3d.toml");
        assert!(matches!(
            SceneConfig::load_from_path(&path),
            Err(ConfigError::FileNotFound(_))
        ));

        std::fs::write(&path, "[viewport]\nwidth = 320\nheight = 200\n").unwrap();
        let config = SceneConfig::load_from_path(&path).unwrap();
        assert_eq!(config.viewport, Viewport::new(320, 200));
        assert!((config.viewport.aspect_ratio() - 0.625).abs() < 1e-12);
    }
}
