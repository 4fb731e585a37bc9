//! Play-field size resource.
//!
//! All game geometry (spawn positions, bounds checks, cloud placement) is
//! expressed in play-field pixels. The window host scales the play field to
//! whatever the window is.

use bevy_ecs::prelude::Resource;

/// Play-field size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: f32,
    /// Height in pixels.
    pub h: f32,
}
