//! Tween descriptions.
//!
//! A tween drives one numeric [`Property`] of one entity from a start value
//! to an end value over a duration, after an optional delay. Callers
//! describe tweens with [`TweenSettings`] (defaults shared by every property
//! of one call) and per-property [`PropertyTween`] overrides; the engine
//! turns them into running [`Tween`]s. See [`crate::systems::tween`].

use std::rc::Rc;

use bevy_ecs::prelude::{Entity, World};

use super::bird::Bird;
use super::mapposition::MapPosition;
use super::opacity::Opacity;
use super::rotation::Rotation;
use super::scale::Scale;
use crate::stage::Stage;
use crate::systems::easing::{Easing, EasingFn};

/// Default tween duration in milliseconds.
pub const DEFAULT_DURATION_MS: f32 = 1000.0;

/// Tween time advanced per update, in milliseconds.
pub const TICK_MS: f32 = 1000.0 / 60.0;

/// Per-step callback, receiving the value just written.
pub type StepFn = Rc<dyn Fn(&mut Stage, f32)>;
/// Completion callback, called exactly once.
pub type CompleteFn = Rc<dyn Fn(&mut Stage)>;

/// Animatable entity attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Rotation,
    ScaleX,
    ScaleY,
    Opacity,
    /// Horizontal pupil offset of a bird.
    PupilDx,
    /// Vertical pupil offset of a bird.
    PupilDy,
}

impl Property {
    /// Current value, or `None` if the entity lacks the backing component.
    pub fn read(self, world: &World, entity: Entity) -> Option<f32> {
        match self {
            Property::X => world.get::<MapPosition>(entity).map(|p| p.x),
            Property::Y => world.get::<MapPosition>(entity).map(|p| p.y),
            Property::Rotation => world.get::<Rotation>(entity).map(|r| r.degrees),
            Property::ScaleX => world.get::<Scale>(entity).map(|s| s.x),
            Property::ScaleY => world.get::<Scale>(entity).map(|s| s.y),
            Property::Opacity => world.get::<Opacity>(entity).map(|o| o.0),
            Property::PupilDx => world.get::<Bird>(entity).map(|b| b.pupil_dx),
            Property::PupilDy => world.get::<Bird>(entity).map(|b| b.pupil_dy),
        }
    }

    /// Write `value`. Returns false if the entity is gone or lacks the
    /// backing component.
    pub fn write(self, world: &mut World, entity: Entity, value: f32) -> bool {
        match self {
            Property::X => world.get_mut::<MapPosition>(entity).map(|mut p| p.x = value),
            Property::Y => world.get_mut::<MapPosition>(entity).map(|mut p| p.y = value),
            Property::Rotation => world
                .get_mut::<Rotation>(entity)
                .map(|mut r| r.degrees = value),
            Property::ScaleX => world.get_mut::<Scale>(entity).map(|mut s| s.x = value),
            Property::ScaleY => world.get_mut::<Scale>(entity).map(|mut s| s.y = value),
            Property::Opacity => world.get_mut::<Opacity>(entity).map(|mut o| o.0 = value),
            Property::PupilDx => world.get_mut::<Bird>(entity).map(|mut b| b.pupil_dx = value),
            Property::PupilDy => world.get_mut::<Bird>(entity).map(|mut b| b.pupil_dy = value),
        }
        .is_some()
    }
}

/// Settings shared by every property of one `animate` call.
#[derive(Clone, Default)]
pub struct TweenSettings {
    pub duration: Option<f32>,
    pub delay: Option<f32>,
    pub easing: Option<Easing>,
    pub on_step: Option<StepFn>,
    pub on_complete: Option<CompleteFn>,
}

impl TweenSettings {
    pub fn with_duration(mut self, ms: f32) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn with_delay(mut self, ms: f32) -> Self {
        self.delay = Some(ms);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_on_step(mut self, f: impl Fn(&mut Stage, f32) + 'static) -> Self {
        self.on_step = Some(Rc::new(f));
        self
    }

    pub fn with_on_complete(mut self, f: impl Fn(&mut Stage) + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }
}

/// Per-property description. Unset fields fall back to the call's
/// [`TweenSettings`], then to the engine defaults. A missing `from` means
/// "the current value when the tween starts"; a bare number is shorthand
/// for `{ to }`.
#[derive(Clone, Default)]
pub struct PropertyTween {
    pub from: Option<f32>,
    pub to: Option<f32>,
    pub duration: Option<f32>,
    pub delay: Option<f32>,
    pub easing: Option<Easing>,
    pub on_step: Option<StepFn>,
    pub on_complete: Option<CompleteFn>,
}

impl From<f32> for PropertyTween {
    fn from(to: f32) -> Self {
        Self::to(to)
    }
}

impl PropertyTween {
    pub fn to(value: f32) -> Self {
        Self {
            to: Some(value),
            ..Self::default()
        }
    }

    pub fn from_to(from: f32, to: f32) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, ms: f32) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn with_delay(mut self, ms: f32) -> Self {
        self.delay = Some(ms);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_on_complete(mut self, f: impl Fn(&mut Stage) + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }
}

/// A running tween.
#[derive(Clone)]
pub struct Tween {
    pub target: Entity,
    pub property: Property,
    /// Milliseconds into the tween; negative while the delay runs.
    pub time: f32,
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub curve: EasingFn,
    pub on_step: Option<StepFn>,
    pub on_complete: Option<CompleteFn>,
}

impl Tween {
    /// Advance one tick and return the value to write and whether the tween
    /// has finished. The final value is exactly `to`.
    pub fn step(&mut self) -> (f32, bool) {
        self.time = (self.time + TICK_MS).min(self.duration);
        if self.time >= self.duration {
            return (self.to, true);
        }
        let t = self.time.max(0.0);
        ((self.curve)(t, self.from, self.to - self.from, self.duration), false)
    }
}
