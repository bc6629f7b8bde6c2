//! 2D geometry primitives used by the road corridors and the simulation.
//!
//! Coordinates are map units in screen orientation: x grows to the right,
//! y grows downward.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Relative and absolute tolerance for approximate coordinate equality.
pub const EPSILON: f64 = 1e-9;

/// Returns true if two floats are equal within [`EPSILON`].
///
/// The comparison passes if the values are within an absolute distance of
/// `EPSILON` or within `EPSILON` relative to the larger magnitude, so it
/// behaves sensibly both near zero and for large map coordinates.
pub fn approx_eq(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff <= EPSILON || diff <= EPSILON * a.abs().max(b.abs())
}

///Represents a position on the map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    ///True when both coordinates are less than or equal to `other`'s.
    pub fn all_le(&self, other: &Point) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    ///True when both coordinates are greater than or equal to `other`'s.
    pub fn all_ge(&self, other: &Point) -> bool {
        self.x >= other.x && self.y >= other.y
    }

    ///True when both coordinates are strictly less than `other`'s.
    pub fn all_lt(&self, other: &Point) -> bool {
        self.x < other.x && self.y < other.y
    }

    /// Bit-for-bit coordinate equality, unlike the tolerant `==`.
    pub fn is_identical(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    ///Returns the point displaced by `v`.
    pub fn offset(&self, v: &Vector2) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add<Vector2> for Point {
    type Output = Point;

    fn add(self, rhs: Vector2) -> Point {
        self.offset(&rhs)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

///Represents a velocity or displacement in map units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vector2 {
    ///Value along the x-axis.
    /// Positive direction is to the right.
    pub x: f64,
    ///Value along the y-axis.
    /// Positive direction is down.
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    ///Returns the magnitude of the vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    ///Returns the scaled vector.
    pub fn scale(&self, scalar: f64) -> Vector2 {
        Vector2 {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    ///Returns true if both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scale(rhs)
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Vector2 { x, y }
    }
}

impl From<Vector2> for [f64; 2] {
    fn from(v: Vector2) -> Self {
        [v.x, v.y]
    }
}

///Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}
