//! Flat shading against a single directional light
use serde::Deserialize;

use crate::config::LIGHT_DIRECTION;
use crate::math::{normalized, Vec3};
use crate::surface::Color;

/// How a light intensity becomes a 0..=255 gray level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeMapping {
    /// `floor(intensity * 255) mod 255`, the historical mapping. A surface
    /// facing the light head-on wraps around to black.
    #[default]
    Wrap,
    /// Clamp intensity to `[0, 1]` before scaling, so full light is white.
    Clamp,
}

impl ShadeMapping {
    pub fn gray_level(self, intensity: f64) -> u8 {
        let level = match self {
            // Floored modulo keeps negative intensities inside 0..255
            ShadeMapping::Wrap => (intensity * 255.0).floor().rem_euclid(255.0),
            ShadeMapping::Clamp => (intensity.clamp(0.0, 1.0) * 255.0).floor(),
        };
        // NaN saturates to 0
        level as u8
    }
}

/// A directional light, stored normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: normalized(direction),
        }
    }

    pub fn direction(&self) -> &Vec3 {
        &self.direction
    }

    /// Cosine between a surface normal and the light direction.
    pub fn intensity(&self, normal: &Vec3) -> f64 {
        normal.dot(&self.direction)
    }

    pub fn shade(&self, normal: &Vec3, mapping: ShadeMapping) -> Color {
        Color::gray(mapping.gray_level(self.intensity(normal)))
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::from(LIGHT_DIRECTION))
    }
}
