use bevy_ecs::prelude::Component;

/// Electrocution pose shown for a moment after a crash.
#[derive(Component, Debug, Clone, Copy)]
pub struct ShockedBird {
    /// Updates until the sheet variant changes again.
    pub counter: i32,
}
