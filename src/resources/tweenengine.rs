//! Active tween storage.
//!
//! At most one tween runs per (entity, property) pair; starting another one
//! on the same pair replaces it. The per-frame driver lives in
//! [`crate::systems::tween::advance_tweens`] and takes the active list out
//! while it runs, so tweens started or cancelled from callbacks during the
//! pass are tracked here and reconciled when the pass ends.

use bevy_ecs::prelude::Entity;
use log::trace;

use crate::components::tween::{Property, Tween};
use crate::error::EngineResult;
use crate::systems::easing::{Easing, EasingFn, EasingRegistry};

#[derive(Default)]
pub struct TweenEngine {
    pub(crate) active: Vec<Tween>,
    easings: EasingRegistry,
    in_pass: bool,
    /// Cancellations issued while a pass holds the active list.
    cancelled: Vec<(Entity, Option<Property>)>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a custom curve available as `Easing::Named(name)`.
    pub fn register_easing(&mut self, name: impl Into<String>, curve: EasingFn) {
        self.easings.register(name, curve);
    }

    pub fn resolve(&self, easing: &Easing) -> EngineResult<EasingFn> {
        self.easings.resolve(easing)
    }

    /// Start `tween`, replacing any active tween on the same pair.
    pub fn start(&mut self, tween: Tween) {
        let (target, property) = (tween.target, tween.property);
        self.active
            .retain(|t| !(t.target == target && t.property == property));
        trace!("tween {:?}.{:?} -> {}", target, property, tween.to);
        self.active.push(tween);
    }

    pub fn cancel(&mut self, target: Entity, property: Property) {
        self.active
            .retain(|t| !(t.target == target && t.property == property));
        if self.in_pass {
            self.cancelled.push((target, Some(property)));
        }
    }

    /// Drop every tween targeting `target`.
    pub fn cancel_entity(&mut self, target: Entity) {
        self.active.retain(|t| t.target != target);
        if self.in_pass {
            self.cancelled.push((target, None));
        }
    }

    /// True if a tween on this pair was started (and not cancelled) since
    /// the active list was last handed out.
    pub fn is_animating(&self, target: Entity, property: Property) -> bool {
        self.active
            .iter()
            .any(|t| t.target == target && t.property == property)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub(crate) fn begin_pass(&mut self) -> Vec<Tween> {
        self.in_pass = true;
        self.cancelled.clear();
        std::mem::take(&mut self.active)
    }

    pub(crate) fn was_cancelled(&self, target: Entity, property: Property) -> bool {
        self.cancelled
            .iter()
            .any(|(e, p)| *e == target && p.is_none_or(|p| p == property))
    }

    /// Merge the survivors of a pass with tweens started during it. Newer
    /// tweens win on the same pair.
    pub(crate) fn end_pass(&mut self, mut survivors: Vec<Tween>) {
        self.in_pass = false;
        let started = std::mem::take(&mut self.active);
        survivors.retain(|t| {
            !self.was_cancelled(t.target, t.property)
                && !started
                    .iter()
                    .any(|s| s.target == t.target && s.property == t.property)
        });
        survivors.extend(started);
        self.active = survivors;
        self.cancelled.clear();
    }
}
