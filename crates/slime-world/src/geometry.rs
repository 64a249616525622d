//! Axis-aligned rectangles in world pixels.

use serde::{Deserialize, Serialize};
use slime_types::Direction;

/// A rectangle anchored at its bottom-left corner. `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Position along the axis `direction` runs on.
    pub fn position_along(&self, direction: Direction) -> f64 {
        if direction.is_horizontal() {
            self.x
        } else {
            self.y
        }
    }

    /// Whether the extents perpendicular to `direction` overlap, i.e. the
    /// two rectangles can see each other looking that way.
    pub fn overlaps_across(&self, other: &Rect, direction: Direction) -> bool {
        if direction.is_horizontal() {
            overlaps(self.y, self.top(), other.y, other.top())
        } else {
            overlaps(self.x, self.right(), other.x, other.right())
        }
    }
}

/// Open-interval overlap of `[a1, a2]` and `[b1, b2]`: touching edges do not count.
pub fn overlaps(a1: f64, a2: f64, b1: f64, b2: f64) -> bool {
    a1 < b2 && a2 > b1
}
