//! Integer pixel geometry.
//!
//! Pointer samples and entity positions share the same client coordinate
//! space, so subtraction is all the drag model needs:
//!
//! - `Point - Point = Offset` (grab offset at gesture start)
//! - `Point - Offset = Point` (entity position for a pointer sample)
//!
//! Offsets are `i64` so the difference of any two points is exact. Turning
//! an offset back into a point clamps to the `i32` range instead of
//! overflowing.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A position in client pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }
}

fn clamp_coord(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Offset {
        Offset::new(
            i64::from(self.x) - i64::from(rhs.x),
            i64::from(self.y) - i64::from(rhs.y),
        )
    }
}

impl Sub<Offset> for Point {
    type Output = Point;

    fn sub(self, rhs: Offset) -> Point {
        Point::new(
            clamp_coord(i64::from(self.x) - rhs.dx),
            clamp_coord(i64::from(self.y) - rhs.dy),
        )
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        Point::new(
            clamp_coord(i64::from(self.x) + rhs.dx),
            clamp_coord(i64::from(self.y) + rhs.dy),
        )
    }
}

/// Axis-aligned box in client pixels, used for hit testing painted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub origin: Point,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(origin: Point, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x.saturating_add(self.width)
            && p.y < self.origin.y.saturating_add(self.height)
    }
}
