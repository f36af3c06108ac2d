//! Grid geometry
//!
//! The world is an 8 x 14 lattice of cells. Entities live in cell units;
//! pixel rectangles are only produced at the snapshot boundary.
//!
//! Rows count upward from the bottom of the screen (row 0) to the top
//! (row 13). Columns wrap (the lattice is a torus on X only); rows scroll.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{GRID_COLS, GRID_ROWS};

/// Axis-aligned rectangle in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl CellRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Single cell at a position
    pub fn cell(pos: IVec2) -> Self {
        Self::new(pos.x, pos.y, 1, 1)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y + self.h
    }

    /// Strict AABB overlap. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.top() && self.top() > other.y
    }
}

/// Direction of a single lateral move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lateral {
    Left,
    Right,
}

impl Lateral {
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Lateral::Left => -1,
            Lateral::Right => 1,
        }
    }
}

/// Cell lattice derived from the viewport at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Grid {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            cell_width: viewport_width / GRID_COLS as f32,
            cell_height: viewport_height / GRID_ROWS as f32,
        }
    }

    /// Top row of the visible screen
    #[inline]
    pub fn top_row(&self) -> i32 {
        self.rows - 1
    }

    /// Half the screen width, in columns
    #[inline]
    pub fn half_cols(&self) -> i32 {
        self.cols / 2
    }

    /// Step a column one cell sideways, wrapping at the edges.
    /// Returns the new column and whether it wrapped.
    pub fn step_col(&self, col: i32, dir: Lateral) -> (i32, bool) {
        let raw = col + dir.delta();
        let wrapped = raw.rem_euclid(self.cols);
        (wrapped, wrapped != raw)
    }

    /// Pixel-space origin of a cell position
    pub fn to_pixels(&self, pos: IVec2) -> Vec2 {
        Vec2::new(pos.x as f32 * self.cell_width, pos.y as f32 * self.cell_height)
    }

    /// Pixel-space rectangle (origin, size) for a cell rectangle
    pub fn rect_to_pixels(&self, rect: &CellRect) -> PixelRect {
        PixelRect {
            origin: self.to_pixels(IVec2::new(rect.x, rect.y)),
            size: Vec2::new(rect.w as f32 * self.cell_width, rect.h as f32 * self.cell_height),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_VIEWPORT_WIDTH,
            crate::consts::DEFAULT_VIEWPORT_HEIGHT,
        )
    }
}

/// Rectangle in pixel space, for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Returns true if `rect` overlaps any of `others`
pub fn overlaps_any<'a>(rect: &CellRect, mut others: impl Iterator<Item = &'a CellRect>) -> bool {
    others.any(|o| rect.overlaps(o))
}
