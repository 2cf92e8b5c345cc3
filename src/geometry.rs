//! Point and frame math shared by endpoint resolution, hit-testing and drags.

use slint::LogicalPosition;
use std::ops::{Add, Sub};

/// A point in some view's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
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

impl From<LogicalPosition> for Point {
    fn from(pos: LogicalPosition) -> Self {
        Point::new(pos.x, pos.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// A view frame: origin plus size.
///
/// Item layouts use `x` as the left edge and `y` as the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn midpoint(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Same size, moved by `offset`.
    pub fn translate(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Same size, placed at `origin`.
    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }
}

/// Convert a frame expressed in one view's space into another view's space.
///
/// `from_origin` and `to_origin` are the origins of both views in a common
/// ancestor space (usually the page).
pub fn convert_frame_to_view(frame: Rect, from_origin: Point, to_origin: Point) -> Rect {
    frame.translate(from_origin - to_origin)
}

/// Convert a page-space point into the space of a view whose frame (in page
/// space) is `view_frame`.
pub fn convert_point_to_view(point: Point, view_frame: Rect) -> Point {
    point - view_frame.origin()
}

/// Squared distance from `point` to the segment `a`-`b`.
pub fn distance_squared_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project onto the line, clamped to the segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * ab.x, a.y + t * ab.y);

    let dx = point.x - closest.x;
    let dy = point.y - closest.y;
    dx * dx + dy * dy
}
