//! Grid coordinates, 2-D vectors, and angle helpers.

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// An integer grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Point {
    /// Create a point from column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point shifted by `(dx, dy)`, or `None` if either coordinate
    /// leaves the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Returns `true` if `other` is one of the eight surrounding cells.
    pub fn is_adjacent_to(self, other: Point) -> bool {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2-D floating point vector used for positions, velocities and accelerations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Vector = Vector::new(0.0, 0.0);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector maps to itself.
    pub fn unit(self) -> Self {
        let len = self.length();
        if len == 0.0 { Self::ZERO } else { self / len }
    }

    /// Dot product.
    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, rhs: Vector) -> Vector {
        rhs * self
    }
}

impl Div<f64> for Vector {
    type Output = Vector;
    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// Convert degrees to radians, wrapping the input into `(-360, 360)` first.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    (degrees % 360.0) * PI / 180.0
}

/// Convert radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic_is_componentwise() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, -5.0);
        assert_eq!(a + b, Vector::new(4.0, -3.0));
        assert_eq!(a - b, Vector::new(-2.0, 7.0));
        assert_eq!(2.0 * a, Vector::new(2.0, 4.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(b / 2.0, Vector::new(1.5, -2.5));
        assert_eq!(-a, Vector::new(-1.0, -2.0));
    }

    #[test]
    fn length_and_unit() {
        let v = Vector::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < f64::EPSILON);
        let u = v.unit();
        assert!((u.length() - 1.0).abs() < 1e-12);
        assert!((u.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(Vector::ZERO.unit(), Vector::ZERO);
    }

    #[test]
    fn dot_product() {
        assert!((Vector::new(1.0, 2.0).dot(Vector::new(3.0, 4.0)) - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn angle_conversion_wraps() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-12);
        assert!((degrees_to_radians(540.0) - PI).abs() < 1e-12);
        assert!((radians_to_degrees(PI / 2.0) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn adjacency_excludes_self() {
        let p = Point::new(4, 4);
        assert!(p.is_adjacent_to(Point::new(5, 5)));
        assert!(p.is_adjacent_to(Point::new(4, 3)));
        assert!(!p.is_adjacent_to(p));
        assert!(!p.is_adjacent_to(Point::new(6, 4)));
    }

    #[test]
    fn offset_past_coordinate_range_is_none() {
        assert_eq!(Point::new(3, 4).offset(-1, 1), Some(Point::new(2, 5)));
        assert_eq!(Point::new(i32::MAX, 0).offset(1, 0), None);
        assert_eq!(Point::new(0, i32::MIN).offset(0, -1), None);
        assert!(!Point::new(i32::MAX, 0).is_adjacent_to(Point::new(i32::MIN, 0)));
    }
}
