//! Optional per-entity callbacks.
//!
//! Hooks let callers bolt behaviour onto an entity without a dedicated
//! component kind: particles draw themselves through `on_draw`, tests count
//! updates through `on_update`, and the game observes deaths through
//! `on_death`.

use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity, World};

use crate::resources::surface::Surface;
use crate::stage::Stage;

/// Runs with full stage access after the entity's own logic.
pub type StageHook = Arc<dyn Fn(&mut Stage, Entity) + Send + Sync>;

/// Custom drawing inside the entity's local transform.
pub type DrawHook = Arc<dyn Fn(&mut dyn Surface, &World, Entity) + Send + Sync>;

#[derive(Component, Clone, Default)]
pub struct EntityHooks {
    /// Called at the end of every update.
    pub on_update: Option<StageHook>,
    /// Called after drawing, outside the local transform.
    pub on_render: Option<StageHook>,
    /// Called while the local transform is applied, after the sprite blit.
    pub on_draw: Option<DrawHook>,
    /// Called once when the entity is destroyed, before it is despawned.
    pub on_death: Option<StageHook>,
}

impl std::fmt::Debug for EntityHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHooks")
            .field("on_update", &self.on_update.is_some())
            .field("on_render", &self.on_render.is_some())
            .field("on_draw", &self.on_draw.is_some())
            .field("on_death", &self.on_death.is_some())
            .finish()
    }
}

impl EntityHooks {
    pub fn with_on_update(mut self, hook: impl Fn(&mut Stage, Entity) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(hook));
        self
    }

    pub fn with_on_render(mut self, hook: impl Fn(&mut Stage, Entity) + Send + Sync + 'static) -> Self {
        self.on_render = Some(Arc::new(hook));
        self
    }

    pub fn with_on_draw(
        mut self,
        hook: impl Fn(&mut dyn Surface, &World, Entity) + Send + Sync + 'static,
    ) -> Self {
        self.on_draw = Some(Arc::new(hook));
        self
    }

    pub fn with_on_death(mut self, hook: impl Fn(&mut Stage, Entity) + Send + Sync + 'static) -> Self {
        self.on_death = Some(Arc::new(hook));
        self
    }
}
