use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Vec2;

/// Axis-aligned rectangle given by its minimum corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive containment: points on the border count as inside.
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// Grow by `fraction` of the width on the left and right, and of the height
    /// on the top and bottom.
    #[must_use]
    pub fn expanded(&self, fraction: f64) -> Rect {
        let dx = self.w * fraction;
        let dy = self.h * fraction;
        Rect::new(self.x - dx, self.y - dy, self.w + 2.0 * dx, self.h + 2.0 * dy)
    }

    /// Same-size rectangle sharing the side facing `dir`.
    #[must_use]
    pub fn adjacent(&self, dir: Direction) -> Rect {
        match dir {
            Direction::Top => Rect::new(self.x, self.y - self.h, self.w, self.h),
            Direction::Bottom => Rect::new(self.x, self.max_y(), self.w, self.h),
            Direction::Left => Rect::new(self.x - self.w, self.y, self.w, self.h),
            Direction::Right => Rect::new(self.max_x(), self.y, self.w, self.h),
        }
    }

    /// Bounding box of `points`; `None` when empty.
    #[must_use]
    pub fn bounding(points: impl IntoIterator<Item = Vec2>) -> Option<Rect> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut any = false;
        for p in points {
            any = true;
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        any.then(|| Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// True when the interiors intersect. Shared borders do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" | "up" | "north" => Some(Direction::Top),
            "bottom" | "down" | "south" => Some(Direction::Bottom),
            "left" | "west" => Some(Direction::Left),
            "right" | "east" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_rects_share_a_border_without_overlapping() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        for dir in Direction::ALL {
            let n = r.adjacent(dir);
            assert!(!r.overlaps(&n), "{dir} neighbour overlaps");
        }
        assert_eq!(r.adjacent(Direction::Right), Rect::new(100.0, 0.0, 100.0, 50.0));
        assert_eq!(r.adjacent(Direction::Top), Rect::new(0.0, -50.0, 100.0, 50.0));
    }

    #[test]
    fn expanded_grows_every_side() {
        let r = Rect::new(0.0, 0.0, 100.0, 200.0).expanded(0.1);
        assert_eq!(r, Rect::new(-10.0, -20.0, 120.0, 240.0));
    }

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(10.0, 0.0)));
        assert!(!r.contains(Vec2::new(10.1, 0.0)));
    }

    #[test]
    fn bounding_of_nothing_is_none() {
        assert!(Rect::bounding(Vec::new()).is_none());
        let b = Rect::bounding([Vec2::new(1.0, 5.0), Vec2::new(-2.0, 3.0)]).unwrap();
        assert_eq!(b, Rect::new(-2.0, 3.0, 3.0, 2.0));
    }
}
