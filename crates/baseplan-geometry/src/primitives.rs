use baseplan_core::Vec2;
use cavalier_contours::polyline::{PlineSource, PlineVertex, Polyline};

use crate::footprint::collision_polygon;
use crate::Piece;

/// Closed straight-segment polyline through `vertices`.
pub fn polygon(vertices: &[Vec2]) -> Polyline<f64> {
    let mut pl = Polyline::new_closed();
    for v in vertices {
        pl.vertex_data.push(PlineVertex::new(v.x, v.y, 0.0));
    }
    pl
}

/// Closed polyline of the ground a piece covers, fillet included.
pub fn footprint_polyline(piece: &Piece) -> Polyline<f64> {
    polygon(&collision_polygon(piece))
}

/// Unsigned area of the ground a piece covers.
pub fn footprint_area(piece: &Piece) -> f64 {
    let pl = footprint_polyline(piece);
    if !is_valid_closed_polyline(&pl) {
        return 0.0;
    }
    pl.area().abs()
}

pub fn is_valid_closed_polyline(pl: &Polyline<f64>) -> bool {
    pl.is_closed() && pl.vertex_count() >= 3
}
