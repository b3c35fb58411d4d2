use baseplan_core::Vec2;

use crate::edges::point_segment_distance;

/// Dead zone, in world units, for the side-of-line tests in [`segments_cross`].
pub const CROSS_EPSILON: f64 = 1e-6;

/// Even-odd ray casting. Boundary points may land either way; use
/// [`strictly_inside`] when that matters.
#[must_use]
pub fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Inside `poly` and further than `tolerance` from every side of it.
#[must_use]
pub fn strictly_inside(p: Vec2, poly: &[Vec2], tolerance: f64) -> bool {
    point_in_polygon(p, poly) && distance_to_boundary(p, poly) > tolerance
}

#[must_use]
pub fn distance_to_boundary(p: Vec2, poly: &[Vec2]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| point_segment_distance(p, poly[i], poly[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Proper crossing of `a1`–`a2` and `b1`–`b2`: each segment's endpoints lie
/// strictly on opposite sides of the other's line. Touching endpoints and
/// collinear overlap do not count.
#[must_use]
pub fn segments_cross(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let side = |o: Vec2, d: Vec2, p: Vec2| -> i8 {
        let len = d.length();
        if len == 0.0 {
            return 0;
        }
        let dist = d.cross(p - o) / len;
        if dist > CROSS_EPSILON {
            1
        } else if dist < -CROSS_EPSILON {
            -1
        } else {
            0
        }
    };
    let da = a2 - a1;
    let db = b2 - b1;
    let s1 = side(b1, db, a1);
    let s2 = side(b1, db, a2);
    let s3 = side(a1, da, b1);
    let s4 = side(a1, da, b2);
    s1 * s2 < 0 && s3 * s4 < 0
}

/// Smallest overlap of the two convex polygons' projections over all of
/// their side normals. Zero or negative means a separating axis exists.
#[must_use]
pub fn penetration_depth(a: &[Vec2], b: &[Vec2]) -> f64 {
    let mut depth = f64::INFINITY;
    for poly in [a, b] {
        let n = poly.len();
        for i in 0..n {
            let Some(axis) = (poly[(i + 1) % n] - poly[i]).normalized() else {
                continue;
            };
            let axis = axis.perp_cw();
            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap <= 0.0 {
                return overlap;
            }
            depth = depth.min(overlap);
        }
    }
    depth
}

fn project(poly: &[Vec2], axis: Vec2) -> (f64, f64) {
    poly.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(cx: f64, cy: f64, half: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(cx - half, cy - half),
            Vec2::new(cx + half, cy - half),
            Vec2::new(cx + half, cy + half),
            Vec2::new(cx - half, cy + half),
        ]
    }

    #[test]
    fn ray_casting_inside_and_outside() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(Vec2::new(1.0, 2.0), &sq));
        assert!(!point_in_polygon(Vec2::new(11.0, 2.0), &sq));
        assert!(!point_in_polygon(Vec2::ZERO, &sq[..2]));
    }

    #[test]
    fn points_near_the_boundary_are_not_strictly_inside() {
        let sq = square(0.0, 0.0, 10.0);
        assert!(strictly_inside(Vec2::new(7.0, 0.0), &sq, 2.0));
        assert!(!strictly_inside(Vec2::new(8.5, 0.0), &sq, 2.0));
        assert!(!strictly_inside(Vec2::new(10.0, 10.0), &sq, 2.0));
    }

    #[test]
    fn crossing_requires_a_proper_intersection() {
        let o = Vec2::ZERO;
        assert!(segments_cross(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0)
        ));
        // T-junction: endpoint resting on the other segment
        assert!(!segments_cross(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            o,
            Vec2::new(0.0, 1.0)
        ));
        // collinear overlap
        assert!(!segments_cross(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0)
        ));
    }

    #[test]
    fn penetration_of_flush_and_overlapping_squares() {
        let a = square(0.0, 0.0, 25.0);
        assert_abs_diff_eq!(penetration_depth(&a, &square(50.0, 0.0, 25.0)), 0.0);
        assert_abs_diff_eq!(penetration_depth(&a, &square(49.0, 0.0, 25.0)), 1.0);
        assert!(penetration_depth(&a, &square(60.0, 0.0, 25.0)) < 0.0);
    }
}
