// World configuration, loadable from JSON

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::faces::Faces;
use super::separate::SeparationParams;
use crate::core::Rect;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse world config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fps must be positive, got {0}")]
    InvalidFps(f32),

    #[error("time_scale must be positive, got {0}")]
    InvalidTimeScale(f32),

    #[error("{name} must be non-negative, got {value}")]
    NegativeBias { name: &'static str, value: f32 },

    #[error("World bounds must have a positive size, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}

/// Tunables of an arcade physics [`World`](super::World)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed steps per second
    pub fps: f32,
    /// Step in fixed increments, carrying leftover time between frames
    pub fixed_step: bool,
    /// Values above 1 slow the simulation down
    pub time_scale: f32,
    /// Most fixed steps run for one frame; extra time is dropped
    pub max_steps_per_frame: u32,
    pub gravity: Vec2,
    pub bounds: Rect,
    /// Which sides of the bounds bodies collide with
    pub check_collision: Faces,
    /// Penetration allowance for body-vs-body contacts
    pub overlap_bias: f32,
    /// Penetration allowance for body-vs-tile contacts
    pub tile_bias: f32,
    /// Always resolve X before Y
    pub force_x: bool,
    /// Use the spatial grid for group candidate selection
    pub use_tree: bool,
    pub tree_cell_size: f32,
    pub paused: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            fixed_step: true,
            time_scale: 1.0,
            max_steps_per_frame: 5,
            gravity: Vec2::ZERO,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            check_collision: Faces::ALL,
            overlap_bias: 4.0,
            tile_bias: 16.0,
            force_x: true,
            use_tree: true,
            tree_cell_size: 128.0,
            paused: false,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps > 0.0 && self.fps.is_finite()) {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if !(self.time_scale > 0.0 && self.time_scale.is_finite()) {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        for (name, value) in [("overlap_bias", self.overlap_bias), ("tile_bias", self.tile_bias)] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeBias { name, value });
            }
        }
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                width: self.bounds.width,
                height: self.bounds.height,
            });
        }
        Ok(())
    }

    /// Duration of one fixed step in seconds
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.fps
    }

    pub fn separation_params(&self) -> SeparationParams {
        SeparationParams {
            overlap_bias: self.overlap_bias,
            force_x: self.force_x,
            gravity: self.gravity,
        }
    }
}
