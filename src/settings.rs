//! Simulation settings
//!
//! Persisted as JSON next to the track files the CLI reads.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::sim::{Ball, Bounds, Planner, validate_ball};

/// Number of impacts in the built-in demo schedule
pub const DEMO_IMPACTS: usize = 120;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Samples per simulated second
    pub frame_rate: f64,
    /// Left wall
    pub x_min: f64,
    /// Right wall
    pub x_max: f64,
    /// Length of each generated impact line
    pub surface_length: f64,
    /// Starting state shared by every track's ball
    pub ball: Ball,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            x_min: DEFAULT_X_MIN,
            x_max: DEFAULT_X_MAX,
            surface_length: DEFAULT_SURFACE_LENGTH,
            ball: Ball::default(),
        }
    }
}

impl SimSettings {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x_min, self.x_max)
    }

    /// Check frame rate, walls, surface length and the ball's radius
    pub fn validate(&self) -> Result<()> {
        Planner::with_settings(self).validate()?;
        validate_ball(&self.ball)
    }

    /// Impacts every two seconds starting at t=2
    pub fn demo_schedule() -> Vec<f64> {
        (0..DEMO_IMPACTS).map(|t| t as f64 * 2.0 + 2.0).collect()
    }

    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
