use bevy_ecs::prelude::Component;

/// Clockwise rotation around the origin point, in degrees.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}
