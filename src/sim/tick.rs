//! Per-frame ball integration
//!
//! The host owns the clock: it samples device gravity and the frame delta
//! and hands both to [`BallSimulator::update`]. Movement is resolved one axis
//! at a time so a ball pressed diagonally into a wall keeps sliding along it.

use glam::Vec2;

use super::collision::{collides, reached_goal};
use super::layout::Layout;
use super::maze::Maze;
use super::state::{Phase, SimulationState, TickSnapshot};
use crate::tuning::PhysicsTuning;

/// Input sampled by the host for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Device gravity, each axis in [-1, 1], y pointing up
    pub gravity: Vec2,
}

impl TickInput {
    pub fn tilt(x: f32, y: f32) -> Self {
        Self {
            gravity: Vec2::new(x, y),
        }
    }
}

/// Single writer of [`SimulationState`]
#[derive(Debug, Clone)]
pub struct BallSimulator {
    state: SimulationState,
    tuning: PhysicsTuning,
}

impl BallSimulator {
    /// Ball at rest in the centre of the maze's start cell
    pub fn new(maze: &Maze, layout: &Layout, tuning: PhysicsTuning) -> Self {
        let start = layout.cell_center(maze.start());
        Self {
            state: SimulationState::at_rest(start, tuning.trail_capacity),
            tuning,
        }
    }

    /// Back to Running at the start cell with all tracking cleared
    pub fn reset(&mut self, maze: &Maze, layout: &Layout) {
        self.state =
            SimulationState::at_rest(layout.cell_center(maze.start()), self.tuning.trail_capacity);
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    /// Snapshot of the current state without advancing
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot::of(&self.state, 0.0, false)
    }

    /// Advance by one frame.
    ///
    /// Frames with `dt` outside (0, max_dt) are dropped, and nothing moves once
    /// the goal has been reached.
    pub fn update(
        &mut self,
        maze: &Maze,
        layout: &Layout,
        input: &TickInput,
        dt: f32,
    ) -> TickSnapshot {
        let dt_ok = dt.is_finite() && dt > 0.0 && dt < self.tuning.max_dt;
        if self.state.phase == Phase::Won || !dt_ok {
            return self.snapshot();
        }

        let t = &self.tuning;
        let state = &mut self.state;

        // Screen y grows downward, device gravity y grows upward
        let accel = Vec2::new(input.gravity.x, -input.gravity.y) * t.sensitivity;
        state.vel = (state.vel + accel * dt) * t.friction;
        state.vel = state.vel.clamp_length_max(t.max_speed);

        let prev = state.pos;
        let target = prev + state.vel * dt;

        let after_x = Vec2::new(target.x, state.pos.y);
        if collides(maze, layout, after_x, t.ball_radius) {
            state.vel.x = 0.0;
        } else {
            state.pos.x = target.x;
        }

        let after_y = Vec2::new(state.pos.x, target.y);
        if collides(maze, layout, after_y, t.ball_radius) {
            state.vel.y = 0.0;
        } else {
            state.pos.y = target.y;
        }

        let moved = state.pos.distance(prev);
        state.traveled += moved;
        state.elapsed += dt;
        if moved > t.trail_noise_floor {
            state.trail.push(state.pos);
        }

        let just_won = reached_goal(maze, layout, state.pos, t.win_radius_factor);
        if just_won {
            state.phase = Phase::Won;
            log::info!(
                "Goal reached in {:.2}s, traveled {:.0}px",
                state.elapsed,
                state.traveled
            );
        }

        TickSnapshot::of(state, moved, just_won)
    }
}
