use baseplan_core::{mean, normalize_deg, triangle_height, BuildingStyle, ShapeKind, Vec2, SIDE};
use serde::Serialize;

use crate::GeometryError;

/// Logical position of a piece: the vertex mean plus the rotation recovered
/// from the vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub centroid: Vec2,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
}

impl Pose {
    #[must_use]
    pub fn new(centroid: Vec2, rotation: f64) -> Self {
        Self {
            centroid,
            rotation: normalize_deg(rotation),
        }
    }
}

/// A piece's geometry: kind, style and an ordered vertex list.
///
/// The pose is never stored on its own. It is derived from the vertices
/// whenever they are set, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    kind: ShapeKind,
    style: BuildingStyle,
    vertices: Vec<Vec2>,
    pose: Pose,
}

impl Piece {
    /// Build a piece of the standard side length at `centroid`, rotated by
    /// `rotation` degrees.
    #[must_use]
    pub fn new(kind: ShapeKind, style: BuildingStyle, centroid: Vec2, rotation: f64) -> Self {
        let pose = Pose::new(centroid, rotation);
        Self {
            kind,
            style,
            vertices: vertices_from_pose(kind, pose, SIDE),
            pose,
        }
    }

    /// Adopt an explicit vertex list, recovering the pose from it.
    pub fn from_vertices(
        kind: ShapeKind,
        style: BuildingStyle,
        vertices: Vec<Vec2>,
    ) -> Result<Self, GeometryError> {
        let pose = pose_from_vertices(kind, &vertices)?;
        Ok(Self {
            kind,
            style,
            vertices,
            pose,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn style(&self) -> BuildingStyle {
        self.style
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        self.pose.centroid
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.pose.rotation
    }

    #[must_use]
    pub fn with_style(mut self, style: BuildingStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            kind: self.kind,
            style: self.style,
            vertices: self.vertices.iter().map(|v| *v + offset).collect(),
            pose: Pose {
                centroid: self.pose.centroid + offset,
                rotation: self.pose.rotation,
            },
        }
    }

    #[must_use]
    pub fn rotated_about(&self, pivot: Vec2, angle_deg: f64) -> Self {
        Self {
            kind: self.kind,
            style: self.style,
            vertices: self
                .vertices
                .iter()
                .map(|v| v.rotated_about(pivot, angle_deg))
                .collect(),
            pose: Pose::new(
                self.pose.centroid.rotated_about(pivot, angle_deg),
                self.pose.rotation + angle_deg,
            ),
        }
    }
}

/// Unrotated vertices around the origin, in the fixed per-kind order. The
/// list is shifted so its mean is exactly the origin.
#[must_use]
pub fn template(kind: ShapeKind, side: f64) -> Vec<Vec2> {
    let h = side / 2.0;
    let raw = match kind {
        // top-left, top-right, bottom-right, bottom-left
        ShapeKind::Square | ShapeKind::Stair => vec![
            Vec2::new(-h, -h),
            Vec2::new(h, -h),
            Vec2::new(h, h),
            Vec2::new(-h, h),
        ],
        // apex, base right, base left
        ShapeKind::Triangle => {
            let th = triangle_height(side);
            vec![
                Vec2::new(0.0, -2.0 * th / 3.0),
                Vec2::new(h, th / 3.0),
                Vec2::new(-h, th / 3.0),
            ]
        }
        // right-angle vertex, then the two leg ends
        ShapeKind::Corner => vec![Vec2::new(-h, -h), Vec2::new(h, -h), Vec2::new(-h, h)],
    };
    let center = mean(&raw);
    raw.into_iter().map(|v| v - center).collect()
}

#[must_use]
pub fn vertices_from_pose(kind: ShapeKind, pose: Pose, side: f64) -> Vec<Vec2> {
    template(kind, side)
        .into_iter()
        .map(|v| v.rotated(pose.rotation) + pose.centroid)
        .collect()
}

/// Recover centroid and rotation from an ordered vertex list.
///
/// - square/stair/corner: heading of `v[0] -> v[1]`, no offset. The square
///   template's first edge already points along +x at rotation 0, so a
///   further 180° would flip every recovered square.
/// - triangle: heading of `centroid -> v[0]`, plus 90°
pub fn pose_from_vertices(kind: ShapeKind, vertices: &[Vec2]) -> Result<Pose, GeometryError> {
    let expected = kind.vertex_count();
    if vertices.len() != expected {
        return Err(GeometryError::VertexCount {
            kind,
            expected,
            found: vertices.len(),
        });
    }
    let centroid = mean(vertices);
    let (reference, offset) = match kind {
        ShapeKind::Square | ShapeKind::Stair | ShapeKind::Corner => {
            (vertices[1] - vertices[0], 0.0)
        }
        ShapeKind::Triangle => (vertices[0] - centroid, 90.0),
    };
    if reference.normalized().is_none() {
        return Err(GeometryError::ZeroLengthEdge { kind });
    }
    Ok(Pose::new(centroid, reference.angle_deg() + offset))
}

/// Twice the signed area, positive for the winding every piece uses.
#[must_use]
pub fn signed_area2(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum()
}
