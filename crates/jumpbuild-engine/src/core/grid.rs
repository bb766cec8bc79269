//! Grid geometry: positions, grid cells and axis-aligned boxes.
//!
//! Every collidable position in a level lives on a 32×32 unit grid. Entities
//! move freely between grid lines; the grid is only consulted when keying the
//! level registry and when snapping after a collision.

use std::fmt;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edge length of a grid cell in world units.
pub const GRID_SIZE: f32 = 32.0;

/// Floor `v` to the nearest multiple of [`GRID_SIZE`] not exceeding it.
pub fn clamp_to_grid(v: f32) -> f32 {
    (v / GRID_SIZE).floor() * GRID_SIZE
}

/// Round `v` to the closest grid line.
pub fn snap_to_grid(v: f32) -> f32 {
    (v / GRID_SIZE).round() * GRID_SIZE
}

/// A point in world space. Y grows downward.
///
/// Equality and hashing compare the raw bit patterns of both coordinates, so
/// a position is only equal to itself bit for bit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin of the grid cell containing this position.
    pub fn clamp(self) -> Self {
        Self::new(clamp_to_grid(self.x), clamp_to_grid(self.y))
    }

    /// The grid cell containing this position.
    pub fn cell(self) -> GridCoord {
        GridCoord::containing(self)
    }

    pub fn offset(self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x: {:.2}, y: {:.2}}}", self.x, self.y)
    }
}

/// Integer coordinate of a grid cell. Used as the level registry key so that
/// floating point drift inside an entity never affects lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The cell containing `pos`.
    pub fn containing(pos: Position) -> Self {
        Self {
            col: (pos.x / GRID_SIZE).floor() as i32,
            row: (pos.y / GRID_SIZE).floor() as i32,
        }
    }

    /// World-space origin (top-left corner) of this cell.
    pub fn origin(self) -> Position {
        Position::new(self.col as f32 * GRID_SIZE, self.row as f32 * GRID_SIZE)
    }

    /// Neighboring cell. Saturates at the edges of the coordinate range.
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col.saturating_add(dcol),
            row: self.row.saturating_add(drow),
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.col, self.row)
    }
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// True when the two boxes share a region of positive area.
    /// Boxes that merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}
