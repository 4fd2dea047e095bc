//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied dt only, no internal clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod maze;
pub mod solver;
pub mod state;
pub mod tick;

pub use collision::{collides, reached_goal};
pub use layout::Layout;
pub use maze::{Cell, Direction, GridPos, Maze, farthest_corner};
pub use solver::{optimal_distance, path_between, shortest_path, shortest_path_length};
pub use state::{Phase, SimulationState, TickSnapshot, Trail};
pub use tick::{BallSimulator, TickInput};
