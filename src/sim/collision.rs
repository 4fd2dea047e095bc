//! Ball vs. maze wall collision
//!
//! The ball is tested against the walls of the single cell containing its
//! centre, using radius-inflated edges. Leaving the grid always collides, so
//! the outer border holds even if a wall flag were missing.

use glam::Vec2;

use super::layout::Layout;
use super::maze::Maze;

/// Whether a ball of `radius` centred at `pos` overlaps a wall
pub fn collides(maze: &Maze, layout: &Layout, pos: Vec2, radius: f32) -> bool {
    let Some(cell_pos) = layout.cell_at(pos, maze.rows(), maze.cols()) else {
        return true;
    };

    let cell = maze.cell(cell_pos);
    let min = layout.cell_origin(cell_pos);
    let max = min + Vec2::splat(layout.cell_size);

    (cell.top && pos.y - radius < min.y)
        || (cell.bottom && pos.y + radius > max.y)
        || (cell.left && pos.x - radius < min.x)
        || (cell.right && pos.x + radius > max.x)
}

/// Whether the ball centre is close enough to the goal cell's centre
pub fn reached_goal(maze: &Maze, layout: &Layout, pos: Vec2, radius_factor: f32) -> bool {
    let goal = layout.cell_center(maze.end());
    pos.distance(goal) < layout.cell_size * radius_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::{Direction, GridPos};

    fn corridor() -> (Maze, Layout) {
        // 1x2, single passage between the cells
        let origin = GridPos::new(0, 0);
        let maze = Maze::from_passages(1, 2, origin, &[(origin, Direction::Right)]);
        (maze, Layout::new(40.0, Vec2::ZERO))
    }

    #[test]
    fn test_centre_is_clear() {
        let (maze, layout) = corridor();
        assert!(!collides(&maze, &layout, Vec2::new(20.0, 20.0), 6.0));
        assert!(!collides(&maze, &layout, Vec2::new(60.0, 20.0), 6.0));
    }

    #[test]
    fn test_walls_collide_with_radius() {
        let (maze, layout) = corridor();
        // Top wall of (0,0) at y=0
        assert!(collides(&maze, &layout, Vec2::new(20.0, 5.9), 6.0));
        assert!(!collides(&maze, &layout, Vec2::new(20.0, 6.0), 6.0));
        // Left border
        assert!(collides(&maze, &layout, Vec2::new(5.0, 20.0), 6.0));
    }

    #[test]
    fn test_open_boundary_is_not_a_collision() {
        let (maze, layout) = corridor();
        // Exactly on the shared edge with no wall
        assert!(!collides(&maze, &layout, Vec2::new(40.0, 20.0), 6.0));
        assert!(!collides(&maze, &layout, Vec2::new(37.0, 20.0), 6.0));
    }

    #[test]
    fn test_outside_grid_collides() {
        let (maze, layout) = corridor();
        assert!(collides(&maze, &layout, Vec2::new(-1.0, 20.0), 0.0));
        assert!(collides(&maze, &layout, Vec2::new(20.0, 41.0), 0.0));
        assert!(collides(&maze, &layout, Vec2::new(81.0, 20.0), 0.0));
    }

    #[test]
    fn test_goal_radius() {
        let (maze, layout) = corridor();
        assert_eq!(maze.end(), GridPos::new(0, 1));
        assert!(reached_goal(&maze, &layout, Vec2::new(60.0, 20.0), 0.3));
        assert!(reached_goal(&maze, &layout, Vec2::new(71.5, 20.0), 0.3));
        assert!(!reached_goal(&maze, &layout, Vec2::new(72.5, 20.0), 0.3));
    }
}
