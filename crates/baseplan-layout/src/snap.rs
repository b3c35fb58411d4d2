//! Turning a cursor position into a committed vertex set.
//!
//! Single pieces try an edge snap first, then the grid, then free placement.
//! Groups snap their bounding box to grid intersections and then pull onto
//! the nearest outside vertex.

use baseplan_core::{angle_delta, triangle_height, BuildingStyle, Rect, ShapeId, ShapeKind, Vec2, SIDE};
use baseplan_geometry::piece::signed_area2;
use baseplan_geometry::{Edge, Piece};
use serde::Serialize;

use crate::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub kind: ShapeKind,
    pub style: BuildingStyle,
    /// Cursor position in world coordinates.
    pub position: Vec2,
    /// Wanted rotation in degrees. Edge snaps pick the closest one they can.
    pub rotation: f64,
}

impl PlacementRequest {
    #[must_use]
    pub fn new(kind: ShapeKind, style: BuildingStyle, position: Vec2) -> Self {
        Self {
            kind,
            style,
            position,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Edge of a committed shape, tagged with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeEdge {
    pub shape: ShapeId,
    pub edge: Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapTarget {
    Edge { shape: ShapeId, edge: usize },
    Grid,
    Free,
}

/// Resolve a single-piece placement. `floor_empty` forces the grid for the
/// first piece on a floor.
#[must_use]
pub fn resolve(
    request: &PlacementRequest,
    edges: &[ShapeEdge],
    settings: &Settings,
    floor_empty: bool,
) -> (Piece, SnapTarget) {
    if let Some(host) = nearest_edge(edges, request.position, settings.snap_threshold) {
        if let Some(piece) = snap_to_edge(request, &host.edge) {
            tracing::debug!(shape = %host.shape, edge = host.edge.index, "edge snap");
            return (
                piece,
                SnapTarget::Edge {
                    shape: host.shape,
                    edge: host.edge.index,
                },
            );
        }
    }
    if settings.grid_enabled || floor_empty {
        let centroid = grid_cell_center(request.position, settings.grid_size);
        return (
            Piece::new(request.kind, request.style, centroid, request.rotation),
            SnapTarget::Grid,
        );
    }
    (
        Piece::new(request.kind, request.style, request.position, request.rotation),
        SnapTarget::Free,
    )
}

/// Closest edge to `p` within `threshold`.
#[must_use]
pub fn nearest_edge(edges: &[ShapeEdge], p: Vec2, threshold: f64) -> Option<&ShapeEdge> {
    edges
        .iter()
        .map(|e| (baseplan_geometry::edges::point_segment_distance(p, e.edge.v1, e.edge.v2), e))
        .filter(|(d, _)| *d <= threshold)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, e)| e)
}

/// Nearest cell center, with centers at `cell / 2 + n * cell`.
#[must_use]
pub fn grid_cell_center(p: Vec2, cell: f64) -> Vec2 {
    if cell <= 0.0 {
        return p;
    }
    let snap = |v: f64| ((v - cell / 2.0) / cell).round() * cell + cell / 2.0;
    Vec2::new(snap(p.x), snap(p.y))
}

/// Nearest grid line crossing.
#[must_use]
pub fn grid_intersection(p: Vec2, cell: f64) -> Vec2 {
    if cell <= 0.0 {
        return p;
    }
    Vec2::new((p.x / cell).round() * cell, (p.y / cell).round() * cell)
}

/// Build the requested piece flush against `host`, on the side its normal
/// faces.
#[must_use]
pub fn snap_to_edge(request: &PlacementRequest, host: &Edge) -> Option<Piece> {
    let (a, b, n) = (host.v1, host.v2, host.normal);
    match request.kind {
        ShapeKind::Square | ShapeKind::Stair => {
            let mut ring = vec![b, a, a + n * SIDE, b + n * SIDE];
            if signed_area2(&ring) < 0.0 {
                ring = vec![a, b, b + n * SIDE, a + n * SIDE];
            }
            closest_rotation(request, ring)
        }
        ShapeKind::Triangle => {
            let apex = host.midpoint + n * triangle_height(SIDE);
            let mut vertices = vec![apex, b, a];
            if signed_area2(&vertices) < 0.0 {
                vertices = vec![apex, a, b];
            }
            Piece::from_vertices(request.kind, request.style, vertices).ok()
        }
        ShapeKind::Corner => {
            let rel = request.position - host.midpoint;
            let out = if rel.dot(n) >= 0.0 { n } else { -n };
            let (corner, other) = if rel.dot(host.tangent) >= 0.0 {
                (b, a)
            } else {
                (a, b)
            };
            let third = corner + out * SIDE;
            let vertices = if (other - corner).cross(third - corner) > 0.0 {
                vec![corner, other, third]
            } else {
                vec![corner, third, other]
            };
            Piece::from_vertices(request.kind, request.style, vertices).ok()
        }
    }
}

/// Of the cyclic orderings of a square ring, the one whose recovered
/// rotation is closest to the request.
fn closest_rotation(request: &PlacementRequest, ring: Vec<Vec2>) -> Option<Piece> {
    (0..ring.len())
        .filter_map(|shift| {
            let mut vertices = ring.clone();
            vertices.rotate_left(shift);
            Piece::from_vertices(request.kind, request.style, vertices).ok()
        })
        .min_by(|p, q| {
            let dp = angle_delta(p.rotation(), request.rotation).abs();
            let dq = angle_delta(q.rotation(), request.rotation).abs();
            dp.total_cmp(&dq)
        })
}

/// Offset that moves the bounding box's minimum corner onto the nearest
/// grid intersection.
#[must_use]
pub fn group_grid_offset(vertices: &[Vec2], cell: f64) -> Vec2 {
    let Some(bounds) = Rect::bounding(vertices.iter().copied()) else {
        return Vec2::ZERO;
    };
    let min = Vec2::new(bounds.x, bounds.y);
    grid_intersection(min, cell) - min
}

/// Offset that lands the closest moving vertex exactly on the closest
/// outside vertex, if they are within `threshold`.
#[must_use]
pub fn vertex_snap_offset(moving: &[Vec2], external: &[Vec2], threshold: f64) -> Option<Vec2> {
    moving
        .iter()
        .flat_map(|m| external.iter().map(move |e| (m.distance(*e), *e - *m)))
        .filter(|(d, _)| *d <= threshold)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, offset)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use baseplan_geometry::piece_edges;

    fn host_square() -> Piece {
        Piece::new(ShapeKind::Square, BuildingStyle::A, Vec2::ZERO, 0.0)
    }

    fn right_edge(p: &Piece) -> Edge {
        piece_edges(p)[1]
    }

    #[test]
    fn square_snaps_flush_to_the_right_edge() {
        let req = PlacementRequest::new(ShapeKind::Square, BuildingStyle::A, Vec2::new(60.0, 5.0));
        let piece = snap_to_edge(&req, &right_edge(&host_square())).unwrap();
        assert_abs_diff_eq!(piece.centroid().x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(piece.centroid().y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_delta(piece.rotation(), 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn square_snap_honours_the_requested_rotation() {
        let req = PlacementRequest::new(ShapeKind::Stair, BuildingStyle::B, Vec2::new(60.0, 0.0))
            .with_rotation(95.0);
        let piece = snap_to_edge(&req, &right_edge(&host_square())).unwrap();
        assert_abs_diff_eq!(piece.rotation(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(piece.centroid().x, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn triangle_apex_sits_one_height_out() {
        let req = PlacementRequest::new(ShapeKind::Triangle, BuildingStyle::A, Vec2::new(40.0, 0.0));
        let piece = snap_to_edge(&req, &right_edge(&host_square())).unwrap();
        let apex = piece.vertices()[0];
        assert_abs_diff_eq!(apex.x, 25.0 + triangle_height(SIDE), epsilon = 1e-9);
        assert_abs_diff_eq!(apex.y, 0.0, epsilon = 1e-9);
        assert!(signed_area2(piece.vertices()) > 0.0);
    }

    #[test]
    fn corner_orientation_follows_the_cursor_quadrant() {
        let edge = right_edge(&host_square());
        // outside, lower half: right angle at the lower endpoint
        let req = PlacementRequest::new(ShapeKind::Corner, BuildingStyle::A, Vec2::new(40.0, 10.0));
        let piece = snap_to_edge(&req, &edge).unwrap();
        assert_eq!(piece.vertices()[0], Vec2::new(25.0, 25.0));
        assert!(piece.vertices().iter().all(|v| v.x >= 25.0 - 1e-9));

        // outside, upper half: right angle at the upper endpoint
        let req = PlacementRequest::new(ShapeKind::Corner, BuildingStyle::A, Vec2::new(40.0, -10.0));
        let piece = snap_to_edge(&req, &edge).unwrap();
        assert_eq!(piece.vertices()[0], Vec2::new(25.0, -25.0));

        // inside: extends back over the host
        let req = PlacementRequest::new(ShapeKind::Corner, BuildingStyle::A, Vec2::new(10.0, 10.0));
        let piece = snap_to_edge(&req, &edge).unwrap();
        assert!(piece.vertices().iter().all(|v| v.x <= 25.0 + 1e-9));
        assert!(signed_area2(piece.vertices()) > 0.0);
    }

    #[test]
    fn grid_centers_sit_half_a_cell_off_the_lines() {
        assert_eq!(grid_cell_center(Vec2::new(3.0, -3.0), 50.0), Vec2::new(25.0, -25.0));
        assert_eq!(grid_cell_center(Vec2::new(60.0, 74.0), 50.0), Vec2::new(75.0, 75.0));
        assert_eq!(grid_intersection(Vec2::new(60.0, -74.0), 50.0), Vec2::new(50.0, -50.0));
    }

    #[test]
    fn first_piece_goes_to_the_grid_and_later_ones_are_free() {
        let settings = Settings::default();
        let req = PlacementRequest::new(ShapeKind::Square, BuildingStyle::A, Vec2::new(7.0, 9.0));
        let (piece, target) = resolve(&req, &[], &settings, true);
        assert_eq!(target, SnapTarget::Grid);
        assert_eq!(piece.centroid(), Vec2::new(25.0, 25.0));
        let (piece, target) = resolve(&req, &[], &settings, false);
        assert_eq!(target, SnapTarget::Free);
        assert_eq!(piece.centroid(), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn edges_beyond_the_threshold_are_ignored() {
        let host = host_square();
        let edges: Vec<ShapeEdge> = piece_edges(&host)
            .into_iter()
            .map(|edge| ShapeEdge {
                shape: ShapeId(1),
                edge,
            })
            .collect();
        assert!(nearest_edge(&edges, Vec2::new(126.0, 0.0), 100.0).is_none());
        let hit = nearest_edge(&edges, Vec2::new(124.0, 3.0), 100.0).unwrap();
        assert_eq!(hit.edge.index, 1);
    }

    #[test]
    fn group_snaps_use_the_box_corner_and_closest_vertex_pair() {
        let verts = [Vec2::new(12.0, 61.0), Vec2::new(80.0, 90.0)];
        assert_eq!(group_grid_offset(&verts, 50.0), Vec2::new(-12.0, -11.0));
        let external = [Vec2::new(85.0, 92.0), Vec2::new(0.0, 0.0)];
        assert_eq!(
            vertex_snap_offset(&verts, &external, 100.0),
            Some(Vec2::new(5.0, 2.0))
        );
        assert_eq!(vertex_snap_offset(&verts, &external, 1.0), None);
    }
}
