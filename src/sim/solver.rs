//! Shortest path over a maze's wall graph
//!
//! Breadth-first search with parent pointers. Used once per maze as the
//! scoring baseline; a perfect maze is always connected, so an unreachable
//! goal means the maze invariant is broken and we fail loudly instead of
//! guessing a distance.

use std::collections::VecDeque;

use super::maze::{GridPos, Maze};

/// Cells along the shortest route between two cells, inclusive of both ends.
///
/// # Panics
/// If `to` is unreachable from `from`, which cannot happen for a generated maze.
pub fn path_between(maze: &Maze, from: GridPos, to: GridPos) -> Vec<GridPos> {
    let cols = maze.cols();
    let index = |p: GridPos| p.row * cols + p.col;

    let mut visited = vec![false; maze.rows() * cols];
    let mut parent: Vec<Option<GridPos>> = vec![None; maze.rows() * cols];
    let mut queue = VecDeque::new();

    visited[index(from)] = true;
    queue.push_back(from);

    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == to {
            found = true;
            break;
        }
        for next in maze.open_neighbors(current) {
            if !visited[index(next)] {
                visited[index(next)] = true;
                parent[index(next)] = Some(current);
                queue.push_back(next);
            }
        }
    }

    assert!(
        found,
        "maze invariant violated: {:?} unreachable from {:?} (seed {})",
        to,
        from,
        maze.seed()
    );

    let mut path = vec![to];
    let mut cursor = to;
    while let Some(prev) = parent[index(cursor)] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

/// Cells from start to end, inclusive
pub fn shortest_path(maze: &Maze) -> Vec<GridPos> {
    path_between(maze, maze.start(), maze.end())
}

/// Number of steps (edges) from start to end
pub fn shortest_path_length(maze: &Maze) -> usize {
    shortest_path(maze).len() - 1
}

/// Shortest path in pixels for the active cell size
pub fn optimal_distance(maze: &Maze, cell_size: f32) -> f32 {
    shortest_path_length(maze) as f32 * cell_size
}
