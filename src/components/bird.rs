//! The player character.

use bevy_ecs::prelude::{Component, Entity};

/// Sub-entities that make up a bird, back to front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdAnatomy {
    pub beak: Entity,
    pub tail_outer: Entity,
    pub tail_inner: Entity,
    pub feet_inner: Entity,
    pub body: Entity,
    pub feet_outer: Entity,
    pub eye: Entity,
    pub pupil: Entity,
    pub wing: Entity,
}

impl BirdAnatomy {
    pub fn all(&self) -> [Entity; 9] {
        [
            self.beak,
            self.tail_outer,
            self.tail_inner,
            self.feet_inner,
            self.body,
            self.feet_outer,
            self.eye,
            self.pupil,
            self.wing,
        ]
    }
}

/// Follow-through tuning for the parts that trail the body.
///
/// Each lagging part eases its rotation towards a target derived from the
/// vertical velocity: `rot += (gain * dir * (dy - bias) - rot) / lag`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdRig {
    pub part_lag: f32,
    pub tail_outer_gain: f32,
    pub tail_inner_gain: f32,
    pub feet_inner_gain: f32,
    pub feet_inner_bias: f32,
    pub feet_outer_gain: f32,
    pub feet_outer_bias: f32,
    /// Divisor for the wing's vertical squash.
    pub wing_lag: f32,
    /// Wing flap decay per update.
    pub flap_decay: f32,
    /// Wing flap impulse per unit of flap strength.
    pub flap_impulse: f32,
}

impl Default for BirdRig {
    fn default() -> Self {
        Self {
            part_lag: 3.0,
            tail_outer_gain: 2.0,
            tail_inner_gain: 1.5,
            feet_inner_gain: -2.0,
            feet_inner_bias: 5.0,
            feet_outer_gain: -1.5,
            feet_outer_bias: 15.0,
            wing_lag: 1.2,
            flap_decay: 0.4,
            flap_impulse: 30.0,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Bird {
    /// Facing: `1.0` right, `-1.0` left.
    pub dir: f32,
    pub vx: f32,
    pub vy: f32,
    /// Default flap strength.
    pub strength: f32,
    /// Gravity added to `vy` every update.
    pub weight: f32,
    pub wing_flap: f32,
    pub pupil_dx: f32,
    pub pupil_dy: f32,
    pub rig: BirdRig,
    pub anatomy: BirdAnatomy,
}
