//! Maze placement in screen space
//!
//! The host owns the viewport; the simulation only needs the cell size and
//! the top-left corner of the grid. Screen y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::maze::GridPos;
use crate::consts::LAYOUT_PADDING;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Side length of a square cell (pixels)
    pub cell_size: f32,
    /// Top-left corner of the grid (pixels)
    pub origin: Vec2,
}

impl Layout {
    pub fn new(cell_size: f32, origin: Vec2) -> Self {
        Self { cell_size, origin }
    }

    /// Largest square cells that fit the viewport with padding, grid centred
    pub fn fit(viewport: Vec2, rows: usize, cols: usize) -> Self {
        let available = (viewport - Vec2::splat(LAYOUT_PADDING * 2.0)).max(Vec2::ZERO);
        let cell_size = (available.x / cols.max(1) as f32).min(available.y / rows.max(1) as f32);
        let grid = Vec2::new(cols as f32, rows as f32) * cell_size;
        Self {
            cell_size,
            origin: (viewport - grid) / 2.0,
        }
    }

    /// Top-left corner of a cell
    #[inline]
    pub fn cell_origin(&self, pos: GridPos) -> Vec2 {
        self.origin + Vec2::new(pos.col as f32, pos.row as f32) * self.cell_size
    }

    #[inline]
    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        self.cell_origin(pos) + Vec2::splat(self.cell_size / 2.0)
    }

    /// Screen point in cell widths from the grid's top-left corner.
    /// Zero for a degenerate layout.
    pub fn to_grid_units(&self, point: Vec2) -> Vec2 {
        if self.cell_size <= 0.0 {
            return Vec2::ZERO;
        }
        (point - self.origin) / self.cell_size
    }

    /// Inverse of [`Layout::to_grid_units`]
    #[inline]
    pub fn from_grid_units(&self, units: Vec2) -> Vec2 {
        self.origin + units * self.cell_size
    }

    /// Grid cell containing a point, or `None` if outside the grid
    pub fn cell_at(&self, point: Vec2, rows: usize, cols: usize) -> Option<GridPos> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = ((point - self.origin) / self.cell_size).floor();
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (row, col) = (local.y as usize, local.x as usize);
        (row < rows && col < cols).then_some(GridPos::new(row, col))
    }
}
