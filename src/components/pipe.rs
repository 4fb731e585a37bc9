//! Obstacle parts: pipes and the live wires dangling from them.

use bevy_ecs::prelude::Component;

/// Which side of the gap a pipe hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Pipe {
    pub placement: Placement,
    /// Sheet variant, one per sprite column.
    pub shape: u32,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Wires {
    pub placement: Placement,
    pub shape: u32,
    /// Sparking and jittering while true.
    pub zap: bool,
    /// Jitter offsets added to the scale.
    pub tx: f32,
    pub ty: f32,
}
