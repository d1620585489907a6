//! Page-space geometry primitives.
//!
//! Everything the layout engine produces is expressed in page units
//! (millimetres at the score's nominal scale). Y grows downward, matching
//! the renderer's coordinate system.

use serde::{Deserialize, Serialize};

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// Build from two opposite corners, normalizing so width/height are
    /// non-negative regardless of corner order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        Rect {
            x,
            y,
            w: (p2.x - p1.x).abs(),
            h: (p2.y - p1.y).abs(),
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 && self.h <= 0.0
    }

    pub fn translated(&self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    /// Smallest rectangle containing both. An empty rect is the identity,
    /// so unions can start from `Rect::default()`.
    pub fn united(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Whether the vertical extents of the two rects overlap.
    pub fn intersects_vertically(&self, top: f64, bottom: f64) -> bool {
        self.top() < bottom && self.bottom() > top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn united_ignores_empty() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.united(&Rect::default()), r);
        assert_eq!(Rect::default().united(&r), r);
    }

    #[test]
    fn from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(5.0, 1.0), Point::new(2.0, -3.0));
        assert_eq!(r, Rect::new(2.0, -3.0, 3.0, 4.0));
    }
}
