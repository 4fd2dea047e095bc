//! Tilt Maze - A tilt-controlled maze game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze generation, solver, ball physics)
//! - `scoring`: Struggle ratio and star rating
//! - `ghost`: Ghost run recording and playback
//! - `persistence`: Key-value storage for ghost runs
//! - `session`: Level progression and per-tick orchestration
//! - `tuning`: Data-driven game feel constants
//! - `platform`: Browser bindings (wasm32 only)

pub mod error;
pub mod ghost;
pub mod persistence;
pub mod platform;
pub mod scoring;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use ghost::{GhostPlayer, GhostRecorder, GhostRun, Snapshot, fingerprint};
pub use scoring::{ScoreResult, StarThresholds};
pub use session::{GameSession, RunSummary, SessionTick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Base maze height at level 1
    pub const BASE_ROWS: usize = 10;
    /// Base maze width at level 1
    pub const BASE_COLS: usize = 7;
    /// Maximum rows added by level progression
    pub const MAX_EXTRA_ROWS: usize = 10;
    /// Maximum cols added by level progression
    pub const MAX_EXTRA_COLS: usize = 5;

    /// Padding around the maze when fitting it into a viewport (pixels)
    pub const LAYOUT_PADDING: f32 = 20.0;

    /// Gravity -> acceleration multiplier
    pub const SENSITIVITY: f32 = 1000.0;
    /// Per-tick velocity damping (lower = more drag)
    pub const FRICTION: f32 = 0.94;
    /// Hard cap on ball speed (pixels/sec)
    pub const MAX_SPEED: f32 = 500.0;
    /// Ball collision radius (pixels)
    pub const BALL_RADIUS: f32 = 6.0;

    /// Trail points kept for rendering
    pub const TRAIL_CAPACITY: usize = 25;
    /// Minimum movement before a trail point is recorded (pixels)
    pub const TRAIL_NOISE_FLOOR: f32 = 0.5;

    /// Win when within this fraction of a cell from the goal centre
    pub const WIN_RADIUS_FACTOR: f32 = 0.3;
    /// Frames at or above this dt are treated as clock glitches
    pub const MAX_DT: f32 = 0.1;

    /// Ghost recording cadence (30 samples per second)
    pub const GHOST_SAMPLE_INTERVAL: f32 = 1.0 / 30.0;
}
