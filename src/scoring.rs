//! Struggle ratio and star rating
//!
//! A run is scored by how far the ball actually rolled compared with the
//! shortest route through the maze. 1.0 is a perfect run.

use serde::{Deserialize, Serialize};

/// Ratio cut-offs for each star count, checked from three stars down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarThresholds {
    pub three_stars: f32,
    pub two_stars: f32,
    pub one_star: f32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three_stars: 1.3,
            two_stars: 2.0,
            one_star: 3.5,
        }
    }
}

impl StarThresholds {
    /// Stars earned for a struggle ratio (0-3)
    pub fn stars(&self, ratio: f32) -> u8 {
        if ratio < self.three_stars {
            3
        } else if ratio < self.two_stars {
            2
        } else if ratio < self.one_star {
            1
        } else {
            0
        }
    }
}

/// Derived score for a finished (or in-progress) run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Traveled / optimal distance
    pub ratio: f32,
    pub stars: u8,
}

impl ScoreResult {
    pub fn compute(traveled: f32, optimal: f32, thresholds: &StarThresholds) -> Self {
        let ratio = struggle_ratio(traveled, optimal);
        Self {
            ratio,
            stars: thresholds.stars(ratio),
        }
    }

    /// Short rating text for the results screen
    pub fn label(&self) -> &'static str {
        match self.stars {
            3 => "Perfect!",
            2 => "Great",
            1 => "Good",
            _ => "Keep trying!",
        }
    }
}

/// Traveled distance over optimal distance; 1.0 when there is no path to walk
pub fn struggle_ratio(traveled: f32, optimal: f32) -> f32 {
    if optimal > 0.0 { traveled / optimal } else { 1.0 }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}
