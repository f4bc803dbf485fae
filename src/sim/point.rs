//! Integer screen coordinates
//!
//! Collision is exact equality on these, so everything that moves must stay
//! snapped to multiples of the cell size.

use std::ops::Add;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An immutable 2D integer coordinate (pixels, or cells before scaling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point(IVec2);

impl Point {
    pub const ZERO: Point = Point(IVec2::ZERO);

    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.0.y
    }

    /// Multiply both coordinates by `factor` (cells -> pixels)
    #[inline]
    pub fn scale(&self, factor: i32) -> Self {
        Self(self.0 * factor)
    }

    /// Wrap into `[0, max_x) x [0, max_y)` using the Euclidean remainder.
    /// An axis with a non-positive bound is left untouched.
    pub fn wrapped(&self, max_x: i32, max_y: i32) -> Self {
        let x = if max_x > 0 { self.0.x.rem_euclid(max_x) } else { self.0.x };
        let y = if max_y > 0 { self.0.y.rem_euclid(max_y) } else { self.0.y };
        Self::new(x, y)
    }

    pub fn as_ivec2(&self) -> IVec2 {
        self.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl From<IVec2> for Point {
    fn from(v: IVec2) -> Self {
        Self(v)
    }
}
