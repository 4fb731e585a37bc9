//! Z-index component for render ordering.
//!
//! The z-index doubles as the render listener's priority on the frame bus,
//! so entities with higher values draw later (on top). It is fixed at spawn
//! time; changing this component afterwards does not re-file the listener.

use bevy_ecs::prelude::Component;

/// Rendering order for 2D drawing. Higher values are drawn on top.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
