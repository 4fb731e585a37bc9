//! The ghost that floats away after a crash.

use bevy_ecs::prelude::{Component, Entity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostAnatomy {
    pub ring_top: Entity,
    pub ring_bottom: Entity,
    pub body: Entity,
    pub wing_right: Entity,
    pub wing_left: Entity,
}

impl GhostAnatomy {
    pub fn all(&self) -> [Entity; 5] {
        [
            self.ring_top,
            self.ring_bottom,
            self.body,
            self.wing_right,
            self.wing_left,
        ]
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct GhostBird {
    pub vy: f32,
    pub anatomy: GhostAnatomy,
}
