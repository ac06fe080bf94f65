//! Collision detection
//!
//! Everything in the playfield is an axis-aligned rectangle, so a catch is a
//! plain AABB overlap test. Touching edges do not count.

use serde::Serialize;

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// True iff the rectangles overlap on both axes
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
