//! Collision (and drawing) outlines for corner pieces.
//!
//! A corner piece is stored as its raw right triangle. What actually sits on
//! the ground depends on the building style's fillet, so collision always goes
//! through [`corner_footprint`] using the piece's own style.

use std::f64::consts::PI;

use baseplan_core::{FilletStyle, ShapeKind, Vec2, ARC_SEGMENTS, DIAGONAL_CUT_RATIO, STEP_COUNT};

use crate::Piece;

/// Polygon for a corner with right angle at `corner` and legs ending at
/// `end1` and `end2`.
///
/// - round: 14 points, the corner plus 13 arc samples from `end1` to `end2`
/// - stepped: 8 points, the corner, `end1` and six stair points ending on `end2`
/// - diagonal: 5 points, the far corner cut at 27% of each leg
#[must_use]
pub fn corner_footprint(corner: Vec2, end1: Vec2, end2: Vec2, fillet: FilletStyle) -> Vec<Vec2> {
    let leg1 = end1 - corner;
    let leg2 = end2 - corner;
    match fillet {
        FilletStyle::Round => {
            let radius = leg1.length();
            let a1 = leg1.y.atan2(leg1.x);
            let a2 = leg2.y.atan2(leg2.x);
            let sweep = wrap_pi(a2 - a1);
            let mut out = Vec::with_capacity(ARC_SEGMENTS + 2);
            out.push(corner);
            for i in 0..=ARC_SEGMENTS {
                let a = a1 + sweep * (i as f64 / ARC_SEGMENTS as f64);
                out.push(corner + Vec2::new(a.cos(), a.sin()) * radius);
            }
            out
        }
        FilletStyle::Stepped => {
            let rise = leg2 * (1.0 / STEP_COUNT as f64);
            let run = leg1 * (1.0 / STEP_COUNT as f64);
            let mut out = Vec::with_capacity(2 + 2 * STEP_COUNT);
            out.push(corner);
            out.push(end1);
            let mut p = end1;
            for _ in 0..STEP_COUNT {
                p += rise;
                out.push(p);
                p = p - run;
                out.push(p);
            }
            out
        }
        FilletStyle::Diagonal => {
            let cut1 = end1 + leg2 * DIAGONAL_CUT_RATIO;
            let cut2 = end2 + leg1 * DIAGONAL_CUT_RATIO;
            vec![corner, end1, cut1, cut2, end2]
        }
    }
}

/// The polygon a piece occupies: its own vertices, or the styled footprint
/// for corners.
#[must_use]
pub fn collision_polygon(piece: &Piece) -> Vec<Vec2> {
    match (piece.kind(), piece.vertices()) {
        (ShapeKind::Corner, [corner, end1, end2]) => {
            corner_footprint(*corner, *end1, *end2, piece.style().fillet())
        }
        _ => piece.vertices().to_vec(),
    }
}

/// Convex pieces covering [`collision_polygon`] exactly.
///
/// Corner footprints are star-shaped around the corner vertex, so a fan from
/// it splits them into triangles. Every other kind is already convex.
#[must_use]
pub fn convex_parts(piece: &Piece) -> Vec<Vec<Vec2>> {
    let poly = collision_polygon(piece);
    if piece.kind() != ShapeKind::Corner || poly.len() <= 3 {
        return vec![poly];
    }
    let apex = poly[0];
    poly.windows(2)
        .skip(1)
        .filter(|w| (w[0] - apex).cross(w[1] - apex).abs() > 1e-9)
        .map(|w| vec![apex, w[0], w[1]])
        .collect()
}

fn wrap_pi(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a < -PI {
        a += 2.0 * PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use baseplan_core::BuildingStyle;

    use crate::piece::signed_area2;

    fn unit_corner() -> (Vec2, Vec2, Vec2) {
        (Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), Vec2::new(0.0, 50.0))
    }

    #[test]
    fn point_counts_per_fillet() {
        let (c, e1, e2) = unit_corner();
        assert_eq!(corner_footprint(c, e1, e2, FilletStyle::Round).len(), 14);
        assert_eq!(corner_footprint(c, e1, e2, FilletStyle::Stepped).len(), 8);
        assert_eq!(corner_footprint(c, e1, e2, FilletStyle::Diagonal).len(), 5);
    }

    #[test]
    fn round_arc_starts_and_ends_on_the_legs() {
        let (c, e1, e2) = unit_corner();
        let pts = corner_footprint(c, e1, e2, FilletStyle::Round);
        assert!(pts[1].approx_eq(e1, 1e-9));
        assert!(pts[13].approx_eq(e2, 1e-9));
        for p in &pts[1..] {
            assert_abs_diff_eq!(p.distance(c), 50.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn round_arc_takes_the_short_way_across_the_seam() {
        // legs at 170° and -100°: the short sweep crosses ±180°
        let c = Vec2::ZERO;
        let e1 = Vec2::from_angle_deg(170.0) * 50.0;
        let e2 = Vec2::from_angle_deg(-100.0) * 50.0;
        let pts = corner_footprint(c, e1, e2, FilletStyle::Round);
        let mid = pts[7];
        assert_abs_diff_eq!(mid.angle_deg().abs(), 145.0, epsilon = 1e-6);
    }

    #[test]
    fn stepped_staircase_lands_on_end2() {
        let (c, e1, e2) = unit_corner();
        let pts = corner_footprint(c, e1, e2, FilletStyle::Stepped);
        assert!(pts[7].approx_eq(e2, 1e-9));
        assert!(pts[2].approx_eq(Vec2::new(50.0, 50.0 / 3.0), 1e-9));
        assert!(pts[3].approx_eq(Vec2::new(100.0 / 3.0, 50.0 / 3.0), 1e-9));
    }

    #[test]
    fn diagonal_cut_points_sit_on_the_bounding_square() {
        let (c, e1, e2) = unit_corner();
        let pts = corner_footprint(c, e1, e2, FilletStyle::Diagonal);
        assert!(pts[2].approx_eq(Vec2::new(50.0, 13.5), 1e-9));
        assert!(pts[3].approx_eq(Vec2::new(13.5, 50.0), 1e-9));
    }

    #[test]
    fn footprints_keep_piece_winding() {
        for style in BuildingStyle::ALL {
            let p = Piece::new(ShapeKind::Corner, style, Vec2::new(10.0, 10.0), 200.0);
            assert!(signed_area2(&collision_polygon(&p)) > 0.0, "{style}");
        }
    }

    #[test]
    fn fan_parts_cover_the_footprint_area() {
        for style in BuildingStyle::ALL {
            let p = Piece::new(ShapeKind::Corner, style, Vec2::ZERO, 30.0);
            let whole = signed_area2(&collision_polygon(&p));
            let parts: f64 = convex_parts(&p).iter().map(|t| signed_area2(t)).sum();
            assert_abs_diff_eq!(whole, parts, epsilon = 1e-6);
        }
    }

    #[test]
    fn non_corner_polygon_is_the_raw_vertices() {
        let p = Piece::new(ShapeKind::Stair, BuildingStyle::C, Vec2::ZERO, 0.0);
        assert_eq!(collision_polygon(&p), p.vertices());
        assert_eq!(convex_parts(&p).len(), 1);
    }
}
