use bevy_ecs::prelude::Component;

use crate::resources::surface::Rgba;

/// Debug markers drawn on top of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct DebugOverlay {
    /// Filled dot at the origin point.
    pub show_origin: bool,
    /// Outline of the unrotated bounding box.
    pub show_bounds: bool,
    pub origin_color: Rgba,
    pub bounds_color: Rgba,
}

impl Default for DebugOverlay {
    fn default() -> Self {
        Self {
            show_origin: false,
            show_bounds: false,
            origin_color: Rgba::RED,
            bounds_color: Rgba::RED,
        }
    }
}
