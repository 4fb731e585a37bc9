//! Debug toggle resource.
//!
//! When present, newly spawned entities draw their origin and/or bounds
//! regardless of their own overlay settings.

use bevy_ecs::prelude::Resource;

/// Global debug overlay switches.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode {
    pub show_origin: bool,
    pub show_bounds: bool,
}
