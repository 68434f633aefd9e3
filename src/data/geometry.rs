//! Plain value types for the two coordinate spaces used by the plot.
//!
//! Screen coordinates are pixels relative to the top-left corner of the
//! drawing surface. Domain coordinates are (point index, -log10 p-value).

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for ScreenPos {
    type Output = ScreenPos;
    fn add(self, rhs: ScreenPos) -> ScreenPos {
        ScreenPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ScreenPos {
    type Output = ScreenPos;
    fn sub(self, rhs: ScreenPos) -> ScreenPos {
        ScreenPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A position in data space: `x` is the (fractional) point index, `y` is -log10(p).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainPos {
    pub x: f64,
    pub y: f64,
}

impl DomainPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub origin: ScreenPos,
    pub size: Size,
}

impl ScreenRect {
    pub const fn new(origin: ScreenPos, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn center(&self) -> ScreenPos {
        ScreenPos::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, p: ScreenPos) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.height
    }
}
