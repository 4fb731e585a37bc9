use bevy_ecs::prelude::Component;

/// Draw opacity in `0.0..=1.0`.
#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Opacity(1.0)
    }
}
