//! Frame playback for animated entities.
//!
//! An animated entity is a regular entity plus a
//! [`FramePlayback`](crate::components::animation::FramePlayback) component.
//! Its update advances playback by one tick and points the sprite rectangle
//! at the current frame before running the base update.

use bevy_ecs::prelude::*;

use crate::components::animation::{FramePlayback, SheetLayout};
use crate::components::sprite::Sprite;
use crate::stage::Stage;
use crate::systems::entity::{EntityConfig, UpdateFn, base_update, spawn_entity};

/// Spawn an entity with frame playback. `update` should call
/// [`update_animated`] (directly or via [`advance_playback`]).
pub fn spawn_animated(
    stage: &mut Stage,
    config: EntityConfig,
    playback: FramePlayback,
    update: UpdateFn,
) -> Entity {
    let entity = spawn_entity(stage, config, update);
    stage.world.entity_mut(entity).insert(playback);
    sync_frame(&mut stage.world, entity);
    entity
}

/// Advance playback one tick and update the sprite rectangle.
pub fn advance_playback(stage: &mut Stage, entity: Entity) {
    if let Some(mut playback) = stage.world.get_mut::<FramePlayback>(entity) {
        playback.advance();
    }
    sync_frame(&mut stage.world, entity);
}

/// Point the sprite rectangle at the current frame. Only the layout axis
/// moves; the other axis belongs to the entity kind.
pub fn sync_frame(world: &mut World, entity: Entity) {
    let Some(playback) = world.get::<FramePlayback>(entity) else {
        return;
    };
    let Some(base) = world.get::<Sprite>(entity).map(|s| s.base) else {
        return;
    };
    let layout = playback.layout;
    let framed = playback.frame_rect(base);
    if let Some(mut sprite) = world.get_mut::<Sprite>(entity) {
        match layout {
            SheetLayout::Vertical => sprite.rect.y = framed.y,
            SheetLayout::Horizontal => sprite.rect.x = framed.x,
        }
    }
}

/// Default update for animated entities.
pub fn update_animated(stage: &mut Stage, entity: Entity) {
    advance_playback(stage, entity);
    base_update(stage, entity);
}

/// Apply a transport control (play, goto, ...) to an animated entity and
/// show the resulting frame immediately. Returns false if the entity has no
/// playback.
pub fn control(stage: &mut Stage, entity: Entity, f: impl FnOnce(&mut FramePlayback)) -> bool {
    let Some(mut playback) = stage.world.get_mut::<FramePlayback>(entity) else {
        return false;
    };
    f(&mut *playback);
    sync_frame(&mut stage.world, entity);
    true
}
