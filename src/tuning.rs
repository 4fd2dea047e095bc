//! Data-driven game feel
//!
//! Physics, scoring and ghost constants grouped so a host can ship a JSON
//! override. Missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::scoring::StarThresholds;

/// Ball physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity -> acceleration multiplier
    pub sensitivity: f32,
    /// Per-tick multiplicative velocity damping (< 1)
    pub friction: f32,
    /// Speed cap (pixels/sec)
    pub max_speed: f32,
    /// Ball collision radius (pixels)
    pub ball_radius: f32,
    pub trail_capacity: usize,
    pub trail_noise_floor: f32,
    /// Goal capture radius as a fraction of cell size
    pub win_radius_factor: f32,
    /// Ticks with dt >= this are dropped
    pub max_dt: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            sensitivity: SENSITIVITY,
            friction: FRICTION,
            max_speed: MAX_SPEED,
            ball_radius: BALL_RADIUS,
            trail_capacity: TRAIL_CAPACITY,
            trail_noise_floor: TRAIL_NOISE_FLOOR,
            win_radius_factor: WIN_RADIUS_FACTOR,
            max_dt: MAX_DT,
        }
    }
}

/// Ghost recording tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostTuning {
    /// Seconds of run time between recorded snapshots
    pub sample_interval: f32,
}

impl Default for GhostTuning {
    fn default() -> Self {
        Self {
            sample_interval: GHOST_SAMPLE_INTERVAL,
        }
    }
}

/// All tunables in one place
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub scoring: StarThresholds,
    pub ghost: GhostTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning override
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
