//! Size and pivot of an entity, and the bounding box they produce.

use bevy_ecs::prelude::Component;

use super::mapposition::MapPosition;

/// Entity size in pixels plus a normalized origin (pivot).
///
/// `origin_x`/`origin_y` of `0.0` put the pivot on the left/top edge,
/// `1.0` on the right/bottom edge. Rotation and scale happen around it.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin_x: f32, origin_y: f32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Horizontal distance from the left edge to the pivot.
    pub fn offset_x(&self) -> f32 {
        self.origin_x * self.width
    }

    /// Vertical distance from the top edge to the pivot.
    pub fn offset_y(&self) -> f32 {
        self.origin_y * self.height
    }

    /// Unrotated, unscaled box for an entity standing at `position`.
    pub fn bounds(&self, position: MapPosition) -> Bounds {
        let left = position.x - self.offset_x();
        let top = position.y - self.offset_y();
        Bounds {
            top,
            bottom: top + self.height,
            left,
            right: left + self.width,
        }
    }
}

/// Edges of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}
