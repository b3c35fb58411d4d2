//! Value types shared across the baseplan crates.

mod kind;
mod point;
mod rect;

pub use kind::{BuildingStyle, FilletStyle, ShapeId, ShapeKind};
pub use point::{angle_delta, mean, normalize_deg, Vec2};
pub use rect::{Direction, Rect};

/// Side length of every piece.
pub const SIDE: f64 = 50.0;

/// Maximum cursor-to-edge (and vertex-to-vertex) distance that still snaps.
pub const SNAP_THRESHOLD: f64 = 100.0;

/// Default grid cell size. Cell centers sit at `GRID_SIZE / 2 + n * GRID_SIZE`.
pub const GRID_SIZE: f64 = 50.0;

/// Distance within which a point counts as lying on a boundary.
pub const EDGE_TOLERANCE: f64 = 2.0;

/// Segments used to discretize a round corner's arc.
pub const ARC_SEGMENTS: usize = 12;

/// Fraction of a leg's length at which a diagonal corner is cut.
pub const DIAGONAL_CUT_RATIO: f64 = 0.27;

/// Number of steps in a stepped corner.
pub const STEP_COUNT: usize = 3;

/// Height of the equilateral triangle piece.
#[must_use]
pub fn triangle_height(side: f64) -> f64 {
    side * 3f64.sqrt() / 2.0
}
