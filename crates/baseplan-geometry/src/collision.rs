//! Placement validation.
//!
//! Everything here is pure and cheap enough to run on every pointer move for
//! the live preview and once more at commit.

use baseplan_core::{Rect, Vec2, EDGE_TOLERANCE, SIDE};
use serde::Serialize;
use thiserror::Error;

use crate::footprint::{collision_polygon, convex_parts};
use crate::predicates::{penetration_depth, segments_cross, strictly_inside};
use crate::Piece;

/// Penetration below this is treated as flush contact.
pub const PENETRATION_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRejected {
    #[error("a piece is already placed here")]
    Duplicate,
    #[error("a vertex lies inside another piece")]
    VertexInside,
    #[error("an edge crosses another piece's edge")]
    EdgeCrossing,
    #[error("the piece overlaps another piece")]
    Overlap,
    #[error("the piece lies outside every buildable area")]
    OutOfBounds,
}

/// Buildable rectangles a candidate has to stay within.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub rects: Vec<Rect>,
    /// Fraction of each rectangle's size added on every side.
    pub padding: f64,
}

impl Boundary {
    /// Every point must fall inside at least one (padded) rectangle.
    ///
    /// Placement passes the raw vertices, not [`collision_polygon`]: a rotated
    /// round corner may bulge past the edge as long as its three vertices
    /// stay inside.
    #[must_use]
    pub fn contains_all(&self, points: &[Vec2]) -> bool {
        let padded: Vec<Rect> = self.rects.iter().map(|r| r.expanded(self.padding)).collect();
        points
            .iter()
            .all(|p| padded.iter().any(|r| r.contains(*p)))
    }
}

/// A placed piece prepared for repeated collision queries.
#[derive(Debug, Clone)]
pub struct Obstacle<'a> {
    piece: &'a Piece,
    polygon: Vec<Vec2>,
    parts: Vec<Vec<Vec2>>,
    bounds: Rect,
}

impl<'a> Obstacle<'a> {
    #[must_use]
    pub fn new(piece: &'a Piece) -> Self {
        let polygon = collision_polygon(piece);
        let bounds = Rect::bounding(polygon.iter().copied())
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        Self {
            piece,
            parts: convex_parts(piece),
            polygon,
            bounds,
        }
    }

    #[must_use]
    pub fn piece(&self) -> &'a Piece {
        self.piece
    }
}

/// Check `candidate` against every obstacle and, when given, the boundary.
///
/// Order: duplicate guard, vertex containment both ways, proper edge
/// crossings, interior penetration, boundary.
pub fn check_placement(
    candidate: &Piece,
    obstacles: &[Obstacle<'_>],
    boundary: Option<&Boundary>,
) -> Result<(), PlacementRejected> {
    let cand = Obstacle::new(candidate);
    for obstacle in obstacles {
        if !near(&cand.bounds, &obstacle.bounds, EDGE_TOLERANCE) {
            continue;
        }
        check_pair(&cand, obstacle).inspect_err(|reason| {
            tracing::debug!(
                %reason,
                kind = %candidate.kind(),
                other = %obstacle.piece.kind(),
                "placement rejected"
            );
        })?;
    }
    if let Some(boundary) = boundary {
        if !boundary.contains_all(candidate.vertices()) {
            tracing::debug!(kind = %candidate.kind(), "placement outside buildable areas");
            return Err(PlacementRejected::OutOfBounds);
        }
    }
    Ok(())
}

/// Convenience wrapper building obstacles on the fly.
pub fn check_against<'a>(
    candidate: &Piece,
    others: impl IntoIterator<Item = &'a Piece>,
    boundary: Option<&Boundary>,
) -> Result<(), PlacementRejected> {
    let obstacles: Vec<Obstacle<'a>> = others.into_iter().map(Obstacle::new).collect();
    check_placement(candidate, &obstacles, boundary)
}

#[must_use]
pub fn overlaps_any<'a>(candidate: &Piece, others: impl IntoIterator<Item = &'a Piece>) -> bool {
    check_against(candidate, others, None).is_err()
}

fn check_pair(cand: &Obstacle<'_>, other: &Obstacle<'_>) -> Result<(), PlacementRejected> {
    if is_duplicate(cand.piece, other.piece) {
        return Err(PlacementRejected::Duplicate);
    }

    let inside = |points: &[Vec2], poly: &[Vec2]| {
        points
            .iter()
            .any(|p| strictly_inside(*p, poly, EDGE_TOLERANCE))
    };
    if inside(&cand.polygon, &other.polygon) || inside(&other.polygon, &cand.polygon) {
        return Err(PlacementRejected::VertexInside);
    }

    if any_edges_cross(&cand.polygon, &other.polygon) {
        return Err(PlacementRejected::EdgeCrossing);
    }

    for a in &cand.parts {
        for b in &other.parts {
            if penetration_depth(a, b) > PENETRATION_TOLERANCE {
                return Err(PlacementRejected::Overlap);
            }
        }
    }
    Ok(())
}

fn is_duplicate(candidate: &Piece, other: &Piece) -> bool {
    if candidate.centroid().distance(other.centroid()) >= SIDE / 2.0 {
        return false;
    }
    let limit = 2.0 * EDGE_TOLERANCE;
    candidate
        .vertices()
        .iter()
        .any(|a| other.vertices().iter().any(|b| a.distance(*b) <= limit))
}

fn any_edges_cross(a: &[Vec2], b: &[Vec2]) -> bool {
    let (na, nb) = (a.len(), b.len());
    (0..na).any(|i| {
        let (a1, a2) = (a[i], a[(i + 1) % na]);
        (0..nb).any(|j| segments_cross(a1, a2, b[j], b[(j + 1) % nb]))
    })
}

fn near(a: &Rect, b: &Rect, slack: f64) -> bool {
    a.x <= b.max_x() + slack
        && b.x <= a.max_x() + slack
        && a.y <= b.max_y() + slack
        && b.y <= a.max_y() + slack
}

#[cfg(test)]
mod tests {
    use super::*;
    use baseplan_core::{BuildingStyle, ShapeKind};

    fn square(x: f64, y: f64) -> Piece {
        Piece::new(ShapeKind::Square, BuildingStyle::A, Vec2::new(x, y), 0.0)
    }

    #[test]
    fn flush_squares_are_legal() {
        let a = square(0.0, 0.0);
        assert_eq!(check_against(&square(50.0, 0.0), [&a], None), Ok(()));
        assert_eq!(check_against(&square(0.0, -50.0), [&a], None), Ok(()));
        assert_eq!(check_against(&square(50.0, 50.0), [&a], None), Ok(()));
    }

    #[test]
    fn squares_one_unit_too_close_overlap() {
        let a = square(0.0, 0.0);
        assert!(overlaps_any(&square(49.0, 0.0), [&a]));
        assert!(overlaps_any(&square(0.0, 49.0), [&a]));
    }

    #[test]
    fn exact_duplicate_is_caught_by_the_guard() {
        let a = square(0.0, 0.0);
        assert_eq!(
            check_against(&square(0.0, 0.0), [&a], None),
            Err(PlacementRejected::Duplicate)
        );
    }

    #[test]
    fn deep_overlap_reports_vertex_inside() {
        let a = square(0.0, 0.0);
        assert_eq!(
            check_against(&square(30.0, 30.0), [&a], None),
            Err(PlacementRejected::VertexInside)
        );
    }

    #[test]
    fn plus_shaped_bars_report_edge_crossing() {
        // no vertex of either bar is inside the other
        let a = Piece::from_vertices(
            ShapeKind::Square,
            BuildingStyle::A,
            vec![
                Vec2::new(-60.0, -10.0),
                Vec2::new(60.0, -10.0),
                Vec2::new(60.0, 10.0),
                Vec2::new(-60.0, 10.0),
            ],
        )
        .unwrap();
        let b = Piece::from_vertices(
            ShapeKind::Square,
            BuildingStyle::A,
            vec![
                Vec2::new(-10.0, -60.0),
                Vec2::new(10.0, -60.0),
                Vec2::new(10.0, 60.0),
                Vec2::new(-10.0, 60.0),
            ],
        )
        .unwrap();
        assert_eq!(
            check_against(&b, [&a], None),
            Err(PlacementRejected::EdgeCrossing)
        );
    }

    #[test]
    fn corner_styles_change_what_collides() {
        // two corners whose raw triangles meet along the hypotenuse
        let a = Piece::new(ShapeKind::Corner, BuildingStyle::C, Vec2::ZERO, 0.0);
        let hyp_mid = baseplan_core::mean(&[a.vertices()[1], a.vertices()[2]]);
        for style in BuildingStyle::ALL {
            let b = a.rotated_about(hyp_mid, 180.0).with_style(style);
            assert!(overlaps_any(&b, [&a]), "{style}");
        }
    }

    #[test]
    fn boundary_rejects_vertices_outside_every_rect() {
        let boundary = Boundary {
            rects: vec![Rect::new(-100.0, -100.0, 200.0, 200.0)],
            padding: 0.0,
        };
        assert_eq!(check_placement(&square(50.0, 50.0), &[], Some(&boundary)), Ok(()));
        assert_eq!(
            check_placement(&square(90.0, 0.0), &[], Some(&boundary)),
            Err(PlacementRejected::OutOfBounds)
        );
        let padded = Boundary {
            padding: 0.1,
            ..boundary
        };
        assert_eq!(check_placement(&square(90.0, 0.0), &[], Some(&padded)), Ok(()));
    }

    #[test]
    fn a_piece_may_straddle_two_adjacent_rects() {
        let boundary = Boundary {
            rects: vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 0.0, 100.0, 100.0),
            ],
            padding: 0.0,
        };
        assert_eq!(check_placement(&square(100.0, 50.0), &[], Some(&boundary)), Ok(()));
    }

    #[test]
    fn boundary_checks_corner_vertices_not_the_arc() {
        // right angle at the origin, legs pointing down-left and down-right
        let c = 50.0 * std::f64::consts::FRAC_1_SQRT_2;
        let corner = Piece::from_vertices(
            ShapeKind::Corner,
            BuildingStyle::A,
            vec![Vec2::ZERO, Vec2::new(c, c), Vec2::new(-c, c)],
        )
        .unwrap();
        let boundary = Boundary {
            rects: vec![Rect::new(-40.0, -5.0, 80.0, 45.0)],
            padding: 0.0,
        };
        let bulge = collision_polygon(&corner)
            .into_iter()
            .fold(f64::MIN, |acc, p| acc.max(p.y));
        assert!(bulge > 45.0);
        assert!(boundary.contains_all(corner.vertices()));
        assert!(!boundary.contains_all(&collision_polygon(&corner)));
        assert_eq!(check_placement(&corner, &[], Some(&boundary)), Ok(()));
    }
}
