//! Pure 2D geometry for piece placement: vertex generation, outward edges,
//! corner footprints and collision.

pub mod collision;
pub mod edges;
pub mod footprint;
pub mod piece;
pub mod predicates;
pub mod primitives;

use baseplan_core::ShapeKind;
use thiserror::Error;

pub use collision::{check_against, check_placement, Boundary, Obstacle, PlacementRejected};
pub use edges::{piece_edges, Edge};
pub use footprint::{collision_polygon, corner_footprint};
pub use piece::{pose_from_vertices, template, vertices_from_pose, Piece, Pose};

/// Geometry that cannot describe a piece. Callers skip such data rather than
/// failing the whole operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("{kind} needs {expected} vertices, found {found}")]
    VertexCount {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind} has a zero-length reference edge")]
    ZeroLengthEdge { kind: ShapeKind },
}
