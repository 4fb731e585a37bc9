use bevy_ecs::prelude::Component;

/// Background cloud. `depth` in `0.25..=1.0` drives size, opacity and
/// parallax speed.
#[derive(Component, Debug, Clone, Copy)]
pub struct Cloud {
    pub depth: f32,
    /// Sheet variant, one per sprite row.
    pub shape: u32,
    /// Breathing phase.
    pub t: f32,
}
