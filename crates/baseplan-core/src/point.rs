use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point or vector in world space. Y grows downwards, like the screen the
/// design is drawn on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len <= f64::EPSILON {
            return None;
        }
        Some(Vec2::new(self.x / len, self.y / len))
    }

    /// Rotate by 90° clockwise in the y-up sense: `(x, y) -> (y, -x)`.
    #[must_use]
    pub fn perp_cw(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }

    /// Heading of this vector in degrees, `atan2(y, x)`.
    #[must_use]
    pub fn angle_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    #[must_use]
    pub fn from_angle_deg(angle_deg: f64) -> Vec2 {
        let (s, c) = angle_deg.to_radians().sin_cos();
        Vec2::new(c, s)
    }

    #[must_use]
    pub fn rotated(self, angle_deg: f64) -> Vec2 {
        rotate_vec(self, angle_deg)
    }

    #[must_use]
    pub fn rotated_about(self, origin: Vec2, angle_deg: f64) -> Vec2 {
        rotate_point(self, angle_deg, origin)
    }

    #[must_use]
    pub fn round(self) -> Vec2 {
        Vec2::new(self.x.round(), self.y.round())
    }

    #[must_use]
    pub fn approx_eq(self, other: Vec2, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}

/// Arithmetic mean of `points`, or the origin for an empty slice.
#[must_use]
pub fn mean(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let mut sum = Vec2::ZERO;
    for p in points {
        sum += *p;
    }
    sum * (1.0 / points.len() as f64)
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed difference `target - current` folded into `(-180, 180]`.
#[must_use]
pub fn angle_delta(target: f64, current: f64) -> f64 {
    let mut diff = normalize_deg(target - current);
    if diff > 180.0 {
        diff -= 360.0;
    }
    diff
}

fn rotate_vec(v: Vec2, angle_deg: f64) -> Vec2 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

fn rotate_point(p: Vec2, angle_deg: f64, origin: Vec2) -> Vec2 {
    rotate_vec(p - origin, angle_deg) + origin
}
