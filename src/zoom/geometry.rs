//! Rectangle and point math shared by the tracker and the animation clock
//!
//! All tracking math runs in `f64`. Values only become integers when a
//! [`CropRect`] is produced, and that conversion always floors so a given
//! fractional position maps to the same pixel on every frame.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D point or vector in source pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Width/height pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise minimum, used to fit a zoom window inside a region
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    pub fn half(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle, top-left origin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on both edges
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Inclusive on both edges
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y && y <= self.bottom()
    }
}

/// Integer crop rectangle handed to the crop sink
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Floors every field (rounds toward negative infinity)
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            left: rect.x.floor() as i32,
            top: rect.y.floor() as i32,
            width: rect.width.floor() as i32,
            height: rect.height.floor() as i32,
        }
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `max < min` the lower bound
/// wins, which is what a zoom window larger than its region needs.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Clamp both coordinates of `point` into `bounds`
pub fn clamp_point(point: Point, bounds: Rect) -> Point {
    Point::new(
        clamp(point.x, bounds.x, bounds.right()),
        clamp(point.y, bounds.y, bounds.bottom()),
    )
}

pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    rect.contains_x(point.x) && rect.contains_y(point.y)
}

/// Build a rectangle from its four edges; inverted edges give a zero extent
pub fn rect_from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_prefers_lower_bound_when_range_is_inverted() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(12.0, 0.0, -100.0), 0.0);
    }

    #[test]
    fn point_in_rect_is_edge_inclusive() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(point_in_rect(Point::new(10.0, 10.0), rect));
        assert!(point_in_rect(Point::new(110.0, 60.0), rect));
        assert!(!point_in_rect(Point::new(110.5, 60.0), rect));
        assert!(!point_in_rect(Point::new(50.0, 9.0), rect));
    }

    #[test]
    fn rect_from_edges_collapses_inverted_edges() {
        let rect = rect_from_edges(10.0, 20.0, 40.0, 25.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 30.0, 5.0));

        let point = rect_from_edges(50.0, 50.0, 30.0, 30.0);
        assert_eq!(point.width, 0.0);
        assert_eq!(point.height, 0.0);
    }

    #[test]
    fn crop_rect_floors_negative_and_positive_values() {
        let crop = CropRect::from_rect(Rect::new(-0.5, 10.9, 639.99, 360.0));
        assert_eq!(crop, CropRect::new(-1, 10, 639, 360));
    }

    #[test]
    fn clamp_point_keeps_point_inside_bounds() {
        let bounds = Rect::new(0.0, 0.0, 640.0, 360.0);
        let clamped = clamp_point(Point::new(-20.0, 400.0), bounds);
        assert_eq!(clamped, Point::new(0.0, 360.0));
    }
}
