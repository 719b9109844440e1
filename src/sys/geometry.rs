//! Integer screen geometry shared by the host boundary and the group model.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// Border extents around a window's client area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Point { x, y } }

    pub fn offset(self, dx: i32, dy: i32) -> Self { Point::new(self.x + dx, self.y + dy) }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self { Size { width, height } }
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Builds the rectangle spanned by two corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
        let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn min_x(&self) -> i32 { self.origin.x }
    pub fn min_y(&self) -> i32 { self.origin.y }
    pub fn max_x(&self) -> i32 { self.origin.x + self.size.width }
    pub fn max_y(&self) -> i32 { self.origin.y + self.size.height }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x() + self.max_x()) / 2,
            (self.min_y() + self.max_y()) / 2,
        )
    }

    pub fn is_empty(&self) -> bool { self.size.width <= 0 || self.size.height <= 0 }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    pub fn with_origin(&self, origin: Point) -> Rect { Rect { origin, size: self.size } }

    /// Grows the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.min_x() - amount,
            self.min_y() - amount,
            self.size.width + 2 * amount,
            self.size.height + 2 * amount,
        )
    }

    pub fn outset(&self, insets: Insets) -> Rect {
        Rect::new(
            self.min_x() - insets.left,
            self.min_y() - insets.top,
            self.size.width + insets.left + insets.right,
            self.size.height + insets.top + insets.bottom,
        )
    }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f32, other: Self) -> bool;
}

impl IsWithin for f32 {
    fn is_within(&self, how_much: f32, other: Self) -> bool { (self - other).abs() < how_much }
}

pub trait RectExt {
    fn intersection(&self, other: &Self) -> Self;
    fn intersects(&self, other: &Self) -> bool;
    fn contains(&self, point: Point) -> bool;
    fn contains_rect(&self, other: Self) -> bool;
    fn union(&self, other: &Self) -> Self;
    fn area(&self) -> i64;
}

impl RectExt for Rect {
    fn intersection(&self, other: &Self) -> Self {
        let min_x = i32::max(self.min_x(), other.min_x());
        let max_x = i32::min(self.max_x(), other.max_x());
        let min_y = i32::max(self.min_y(), other.min_y());
        let max_y = i32::min(self.max_y(), other.max_y());
        Rect::new(
            min_x,
            min_y,
            i32::max(max_x - min_x, 0),
            i32::max(max_y - min_y, 0),
        )
    }

    fn intersects(&self, other: &Self) -> bool { !self.intersection(other).is_empty() }

    fn contains(&self, point: Point) -> bool {
        (self.min_x()..self.max_x()).contains(&point.x)
            && (self.min_y()..self.max_y()).contains(&point.y)
    }

    fn contains_rect(&self, other: Self) -> bool {
        self.min_x() <= other.min_x()
            && self.min_y() <= other.min_y()
            && self.max_x() >= other.max_x()
            && self.max_y() >= other.max_y()
    }

    fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let min = Point::new(
            i32::min(self.min_x(), other.min_x()),
            i32::min(self.min_y(), other.min_y()),
        );
        let max = Point::new(
            i32::max(self.max_x(), other.max_x()),
            i32::max(self.max_y(), other.max_y()),
        );
        Rect::from_corners(min, max)
    }

    fn area(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        i64::from(self.size.width) * i64::from(self.size.height)
    }
}
