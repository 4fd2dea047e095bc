//! Ball simulation state
//!
//! Owned by [`super::tick::BallSimulator`]; everything outside the simulator
//! sees it through a shared reference or a [`TickSnapshot`] copy.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Ball responds to tilt
    #[default]
    Running,
    /// Goal reached; physics frozen until reset
    Won,
}

/// Bounded history of recent ball positions (oldest first)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest when full
    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }
}

/// Everything that changes tick to tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    /// Total pixels travelled this run
    pub(crate) traveled: f32,
    /// Seconds of accepted ticks this run
    pub(crate) elapsed: f32,
    pub(crate) trail: Trail,
    pub(crate) phase: Phase,
}

impl SimulationState {
    /// Fresh state with the ball at rest at `pos`
    pub fn at_rest(pos: Vec2, trail_capacity: usize) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            traveled: 0.0,
            elapsed: 0.0,
            trail: Trail::new(trail_capacity),
            phase: Phase::Running,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_won(&self) -> bool {
        self.phase == Phase::Won
    }
}

/// Immutable result of one tick, handed to scoring, ghosts and the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub has_won: bool,
    /// True only on the tick that entered the Won phase
    pub just_won: bool,
    /// Pixels moved during this tick
    pub distance_delta: f32,
    pub traveled: f32,
    pub elapsed: f32,
}

impl TickSnapshot {
    pub(crate) fn of(state: &SimulationState, distance_delta: f32, just_won: bool) -> Self {
        Self {
            position: state.pos,
            velocity: state.vel,
            has_won: state.has_won(),
            just_won,
            distance_delta,
            traveled: state.traveled,
            elapsed: state.elapsed,
        }
    }
}
