use bevy_ecs::prelude::Component;

/// A feather drifting down after a crash, swaying on a sine.
#[derive(Component, Debug, Clone, Copy)]
pub struct Feather {
    pub vx: f32,
    pub vy: f32,
    /// Horizontal damping factor.
    pub dvx: f32,
    /// Downward acceleration.
    pub dvy: f32,
    pub max_vy: f32,
    /// Spin offset, decaying by `ddr`.
    pub dr: f32,
    pub ddr: f32,
    /// Sway phase and its per-update increment.
    pub t: f32,
    pub wt: f32,
    pub amplitude: f32,
}
