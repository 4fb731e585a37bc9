//! Smoke burst made of circle particles.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

use crate::resources::surface::Rgba;

/// Controller for one burst: a growing blast disc, then a spray of
/// particles once the blast is big enough.
#[derive(Component, Debug, Clone)]
pub struct Poof {
    pub blast: Entity,
    pub blast_size: f32,
    pub particles: SmallVec<[Entity; 64]>,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PoofParticle {
    pub radius: f32,
    pub vx: f32,
    pub vy: f32,
    /// Upward acceleration.
    pub vya: f32,
    /// Radius lost per update.
    pub decay: f32,
    pub amplitude: f32,
    pub t: f32,
    pub dt: f32,
    pub light: Rgba,
    pub shade: Rgba,
}
