//! Composite ownership.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

/// Sub-entities owned by a composite. Destroying the owner destroys these.
#[derive(Component, Clone, Debug, Default)]
pub struct Parts(pub SmallVec<[Entity; 10]>);

impl Parts {
    pub fn remove(&mut self, entity: Entity) {
        self.0.retain(|e| *e != entity);
    }
}
