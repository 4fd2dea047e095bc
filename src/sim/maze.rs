//! Perfect maze generation
//!
//! Randomized depth-first backtracking over an explicit stack. The neighbour
//! shuffle is driven by a `Pcg32` seeded only from the maze seed, so the same
//! `(rows, cols, start, seed)` always produces the same grid on every platform.
//! Ghost runs depend on this: a ghost recorded on a maze must replay on it.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A grid coordinate (row-major, row 0 at the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Cardinal directions, in neighbour enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Wall flags for a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Cell {
    /// All four walls standing
    pub const CLOSED: Cell = Cell {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    #[inline]
    pub fn has_wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn clear_wall(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.top = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// An immutable perfect maze.
///
/// Deserializing checks the perfect-maze properties, so a `Maze` from JSON is
/// as trustworthy as one from [`Maze::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeRecord")]
pub struct Maze {
    rows: usize,
    cols: usize,
    /// Row-major cells
    cells: Vec<Cell>,
    start: GridPos,
    end: GridPos,
    seed: u64,
}

impl Maze {
    /// Generate a perfect maze.
    ///
    /// Dimensions below 1 are raised to 1 and a start outside the grid is
    /// clamped onto it, so this never fails.
    pub fn generate(rows: usize, cols: usize, start: GridPos, seed: u64) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let start = GridPos::new(start.row.min(rows - 1), start.col.min(cols - 1));
        let end = farthest_corner(start, rows, cols);

        let mut maze = Self {
            rows,
            cols,
            cells: vec![Cell::CLOSED; rows * cols],
            start,
            end,
            seed,
        };
        maze.carve(&mut Pcg32::seed_from_u64(seed));
        maze
    }

    fn carve(&mut self, rng: &mut Pcg32) {
        let mut visited = vec![false; self.rows * self.cols];
        let mut stack = vec![self.start];
        visited[self.index(self.start)] = true;

        let mut candidates: Vec<(GridPos, Direction)> = Vec::with_capacity(4);
        while let Some(&current) = stack.last() {
            candidates.clear();
            candidates.extend(
                Direction::ALL
                    .iter()
                    .filter_map(|&dir| self.neighbor(current, dir).map(|n| (n, dir)))
                    .filter(|(n, _)| !visited[self.index(*n)]),
            );

            if candidates.is_empty() {
                stack.pop();
                continue;
            }

            candidates.shuffle(rng);
            let (next, dir) = candidates[0];
            self.remove_wall_pair(current, next, dir);
            visited[self.index(next)] = true;
            stack.push(next);
        }
    }

    /// Clear the shared wall on both sides
    fn remove_wall_pair(&mut self, from: GridPos, to: GridPos, dir: Direction) {
        let from_idx = self.index(from);
        let to_idx = self.index(to);
        self.cells[from_idx].clear_wall(dir);
        self.cells[to_idx].clear_wall(dir.opposite());
    }

    #[inline]
    fn index(&self, pos: GridPos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Bounds-checked neighbour in `dir`
    pub fn neighbor(&self, pos: GridPos, dir: Direction) -> Option<GridPos> {
        match dir {
            Direction::Up if pos.row > 0 => Some(GridPos::new(pos.row - 1, pos.col)),
            Direction::Down if pos.row + 1 < self.rows => Some(GridPos::new(pos.row + 1, pos.col)),
            Direction::Left if pos.col > 0 => Some(GridPos::new(pos.row, pos.col - 1)),
            Direction::Right if pos.col + 1 < self.cols => Some(GridPos::new(pos.row, pos.col + 1)),
            _ => None,
        }
    }

    /// Neighbours reachable without crossing a wall
    pub fn open_neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        let cell = self.cell(pos);
        Direction::ALL
            .into_iter()
            .filter(move |&dir| !cell.has_wall(dir))
            .filter_map(move |dir| self.neighbor(pos, dir))
    }

    /// Number of interior wall pairs that have been removed
    pub fn passage_count(&self) -> usize {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| GridPos::new(row, col)))
            .map(|pos| {
                let cell = self.cell(pos);
                let right = (pos.col + 1 < self.cols && !cell.right) as usize;
                let down = (pos.row + 1 < self.rows && !cell.bottom) as usize;
                right + down
            })
            .sum()
    }

    #[inline]
    pub fn cell(&self, pos: GridPos) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    pub fn end(&self) -> GridPos {
        self.end
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check the properties `generate` guarantees: closed border, mirrored
    /// walls, end at the farthest corner, and a spanning tree of passages.
    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidMaze(msg)) };

        if self.rows == 0 || self.cols == 0 {
            return invalid(format!("empty grid {}x{}", self.rows, self.cols));
        }
        if self.rows.checked_mul(self.cols) != Some(self.cells.len()) {
            return invalid(format!(
                "{} cells for a {}x{} grid",
                self.cells.len(),
                self.rows,
                self.cols
            ));
        }
        for pos in [self.start, self.end] {
            if pos.row >= self.rows || pos.col >= self.cols {
                return invalid(format!("{pos:?} is outside the grid"));
            }
        }
        if self.end != farthest_corner(self.start, self.rows, self.cols) {
            return invalid(format!("end {:?} is not the farthest corner", self.end));
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = GridPos::new(row, col);
                for dir in Direction::ALL {
                    let wall = self.cell(pos).has_wall(dir);
                    let consistent = match self.neighbor(pos, dir) {
                        Some(n) => wall == self.cell(n).has_wall(dir.opposite()),
                        None => wall,
                    };
                    if !consistent {
                        return invalid(format!("inconsistent {dir:?} wall at {pos:?}"));
                    }
                }
            }
        }

        let total = self.cells.len();
        if self.passage_count() != total - 1 {
            let passages = self.passage_count();
            return invalid(format!("{passages} passages, expected {}", total - 1));
        }

        // n - 1 passages plus full reachability makes a spanning tree
        let mut seen = vec![false; total];
        let mut frontier = VecDeque::from([self.start]);
        seen[self.index(self.start)] = true;
        let mut reached = 1;
        while let Some(pos) = frontier.pop_front() {
            for next in self.open_neighbors(pos) {
                let idx = self.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    reached += 1;
                    frontier.push_back(next);
                }
            }
        }
        if reached != total {
            return invalid(format!("only {reached} of {total} cells reachable"));
        }
        Ok(())
    }

    /// Hand-carved maze for tests that need a specific wall layout
    #[cfg(test)]
    pub(crate) fn from_passages(
        rows: usize,
        cols: usize,
        start: GridPos,
        passages: &[(GridPos, Direction)],
    ) -> Self {
        let mut maze = Self {
            rows,
            cols,
            cells: vec![Cell::CLOSED; rows * cols],
            start,
            end: farthest_corner(start, rows, cols),
            seed: 0,
        };
        for &(pos, dir) in passages {
            let next = maze.neighbor(pos, dir).expect("passage leaves the grid");
            maze.remove_wall_pair(pos, next, dir);
        }
        maze
    }
}

/// Unchecked wire form of a [`Maze`]
#[derive(Deserialize)]
struct MazeRecord {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: GridPos,
    end: GridPos,
    seed: u64,
}

impl TryFrom<MazeRecord> for Maze {
    type Error = Error;

    fn try_from(record: MazeRecord) -> Result<Self> {
        let maze = Maze {
            rows: record.rows,
            cols: record.cols,
            cells: record.cells,
            start: record.start,
            end: record.end,
            seed: record.seed,
        };
        maze.validate()?;
        Ok(maze)
    }
}

/// Corner with the greatest Manhattan distance from `start`.
/// Ties go to the first corner in (0,0), (0,c-1), (r-1,0), (r-1,c-1) order.
pub fn farthest_corner(start: GridPos, rows: usize, cols: usize) -> GridPos {
    let corners = [
        GridPos::new(0, 0),
        GridPos::new(0, cols - 1),
        GridPos::new(rows - 1, 0),
        GridPos::new(rows - 1, cols - 1),
    ];

    let mut best = corners[0];
    let mut best_dist = start.manhattan(best);
    for corner in &corners[1..] {
        let dist = start.manhattan(*corner);
        if dist > best_dist {
            best = *corner;
            best_dist = dist;
        }
    }
    best
}
