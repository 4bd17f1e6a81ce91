//! Axis-aligned rectangle geometry
//!
//! Screen convention: origin at the playfield's top-left, y grows downward,
//! `pos` is a rectangle's top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Playfield-sized rectangle at the origin
    pub fn field(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap: shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Fully inside `outer` (edges may touch)
    pub fn within(&self, outer: &Rect) -> bool {
        self.pos.x >= outer.pos.x
            && self.pos.y >= outer.pos.y
            && self.max().x <= outer.max().x
            && self.max().y <= outer.max().y
    }

    /// Entirely outside `outer` (no overlap at all)
    pub fn outside(&self, outer: &Rect) -> bool {
        !self.overlaps(outer)
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: Vec2) -> Self {
        Self::new(self.pos - margin, self.size + margin * 2.0)
    }
}

/// Valid range for a rectangle's top-left corner inside a field, never negative
#[inline]
pub fn placement_range(field: Vec2, size: Vec2) -> Vec2 {
    (field - size).max(Vec2::ZERO)
}
