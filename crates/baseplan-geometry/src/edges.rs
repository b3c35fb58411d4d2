use baseplan_core::{ShapeKind, Vec2};
use serde::Serialize;

use crate::Piece;

/// One outward-facing side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub v1: Vec2,
    pub v2: Vec2,
    /// Unit vector from `v1` to `v2`.
    pub tangent: Vec2,
    /// Unit vector pointing away from the piece.
    pub normal: Vec2,
    pub midpoint: Vec2,
    pub index: usize,
}

impl Edge {
    fn between(v1: Vec2, v2: Vec2, index: usize) -> Option<Edge> {
        let tangent = (v2 - v1).normalized()?;
        Some(Edge {
            v1,
            v2,
            tangent,
            normal: tangent.perp_cw(),
            midpoint: (v1 + v2) * 0.5,
            index,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.v1.distance(self.v2)
    }

    /// True when both endpoints coincide with `other`'s, in either order.
    #[must_use]
    pub fn matches(&self, other: &Edge, tolerance: f64) -> bool {
        let close = |a: Vec2, b: Vec2| a.distance(b) <= tolerance;
        (close(self.v1, other.v1) && close(self.v2, other.v2))
            || (close(self.v1, other.v2) && close(self.v2, other.v1))
    }
}

/// Outward edges of `piece`. Corners expose only their two legs.
///
/// Zero-length sides are skipped.
#[must_use]
pub fn piece_edges(piece: &Piece) -> Vec<Edge> {
    let v = piece.vertices();
    if piece.kind() == ShapeKind::Corner {
        return corner_legs(v);
    }
    let n = v.len();
    let edges: Vec<Edge> = (0..n)
        .filter_map(|i| Edge::between(v[i], v[(i + 1) % n], i))
        .collect();
    if edges.len() < n {
        tracing::trace!(kind = %piece.kind(), "skipped zero-length edges");
    }
    edges
}

fn corner_legs(v: &[Vec2]) -> Vec<Edge> {
    let [corner, end1, end2] = v else {
        return Vec::new();
    };
    [(*corner, *end1, *end2, 0), (*end2, *corner, *end1, 1)]
        .into_iter()
        .filter_map(|(a, b, opposite, index)| {
            let mut edge = Edge::between(a, b, index)?;
            if edge.normal.dot(opposite - edge.midpoint) > 0.0 {
                edge.normal = -edge.normal;
            }
            Some(edge)
        })
        .collect()
}

/// Distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
