//! Entity lifecycle: spawn, base update, destroy.
//!
//! Spawning an entity inserts the base component set and files two
//! listeners on the frame bus: its update function on [`Phase::Update`]
//! at priority 0 and its renderer on [`Phase::Render`] at its z-index.
//! Destroying it removes both listeners before anything else, so no
//! callback ever reaches a destroyed entity.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::debugoverlay::DebugOverlay;
use crate::components::extent::{Bounds, Extent};
use crate::components::hooks::EntityHooks;
use crate::components::listeners::BusListeners;
use crate::components::mapposition::MapPosition;
use crate::components::opacity::Opacity;
use crate::components::parts::Parts;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::{Rect, Sprite};
use crate::components::zindex::ZIndex;
use crate::events::framebus::Phase;
use crate::resources::debugmode::DebugMode;
use crate::resources::surface::Rgba;
use crate::stage::Stage;
use crate::systems::render::render_entity;

/// Per-frame logic for one entity kind.
pub type UpdateFn = fn(&mut Stage, Entity);

/// Everything needed to spawn a drawable entity. Spawning copies it, so a
/// config can be reused as a template.
#[derive(Clone, Debug)]
pub struct EntityConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub z_index: i32,
    pub sprite: Option<String>,
    pub sprite_rect: Rect,
    pub show_origin: bool,
    pub show_bounds: bool,
    pub origin_color: Rgba,
    pub bounds_color: Rgba,
    pub hooks: EntityHooks,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            origin_x: 0.0,
            origin_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            z_index: 0,
            sprite: None,
            sprite_rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            show_origin: false,
            show_bounds: false,
            origin_color: Rgba::RED,
            bounds_color: Rgba::RED,
            hooks: EntityHooks::default(),
        }
    }
}

impl EntityConfig {
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_origin(mut self, origin_x: f32, origin_y: f32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale_x = sx;
        self.scale_y = sy;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_zindex(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Sprite from `key`, sized to the source rectangle.
    pub fn with_sprite(mut self, key: impl Into<String>, rect: Rect) -> Self {
        self.sprite = Some(key.into());
        self.sprite_rect = rect;
        self.width = rect.width;
        self.height = rect.height;
        self
    }

    pub fn with_debug(mut self, show_origin: bool, show_bounds: bool) -> Self {
        self.show_origin = show_origin;
        self.show_bounds = show_bounds;
        self
    }

    pub fn with_hooks(mut self, hooks: EntityHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// Spawn an entity and file its update and render listeners.
pub fn spawn_entity(stage: &mut Stage, config: EntityConfig, update: UpdateFn) -> Entity {
    let debug = stage
        .world
        .get_resource::<DebugMode>()
        .copied()
        .unwrap_or_default();
    let EntityConfig {
        x,
        y,
        width,
        height,
        origin_x,
        origin_y,
        rotation,
        scale_x,
        scale_y,
        opacity,
        z_index,
        sprite,
        sprite_rect,
        show_origin,
        show_bounds,
        origin_color,
        bounds_color,
        hooks,
    } = config;

    let mut spawned = stage.world.spawn((
        MapPosition::new(x, y),
        Extent {
            width,
            height,
            origin_x,
            origin_y,
        },
        Rotation { degrees: rotation },
        Scale::new(scale_x, scale_y),
        Opacity(opacity),
        ZIndex(z_index),
        DebugOverlay {
            show_origin: show_origin || debug.show_origin,
            show_bounds: show_bounds || debug.show_bounds,
            origin_color,
            bounds_color,
        },
        hooks,
    ));
    if let Some(key) = sprite {
        spawned.insert(Sprite::new(key, sprite_rect));
    }
    let entity = spawned.id();

    let update_id = stage
        .bus
        .on(Phase::Update, move |stage: &mut Stage| update(stage, entity), 0);
    let render_id = stage.bus.on(
        Phase::Render,
        move |stage: &mut Stage| render_entity(stage, entity),
        z_index,
    );
    stage.world.entity_mut(entity).insert(BusListeners {
        update: update_id,
        render: render_id,
    });
    entity
}

/// Base update: runs the entity's `on_update` hook. Kind-specific update
/// functions call this after their own logic.
pub fn base_update(stage: &mut Stage, entity: Entity) {
    let hook = stage
        .world
        .get::<EntityHooks>(entity)
        .and_then(|h| h.on_update.clone());
    if let Some(hook) = hook {
        hook(stage, entity);
    }
}

/// Destroy `entity`: unregister its listeners, cancel its timers and
/// tweens, run `on_death`, despawn it, then destroy its parts.
///
/// Returns false (and does nothing) if it is already destroyed or dying.
pub fn destroy(stage: &mut Stage, entity: Entity) -> bool {
    let Ok(mut entity_mut) = stage.world.get_entity_mut(entity) else {
        debug!("destroy ignored: {:?} no longer exists", entity);
        return false;
    };
    let Some(listeners) = entity_mut.take::<BusListeners>() else {
        debug!("destroy ignored: {:?} is already being destroyed", entity);
        return false;
    };
    let parts = entity_mut.get::<Parts>().map(|p| p.0.clone());
    let on_death = entity_mut.get::<EntityHooks>().and_then(|h| h.on_death.clone());

    stage.bus.off(Phase::Update, listeners.update);
    stage.bus.off(Phase::Render, listeners.render);
    stage.timers.cancel_owned_by(entity);
    stage.tweens.cancel_entity(entity);

    if let Some(hook) = on_death {
        hook(stage, entity);
    }
    stage.world.despawn(entity);

    for part in parts.into_iter().flatten() {
        destroy(stage, part);
    }
    true
}

/// Bounding box of a live entity.
pub fn bounds_of(world: &World, entity: Entity) -> Option<Bounds> {
    let position = world.get::<MapPosition>(entity)?;
    let extent = world.get::<Extent>(entity)?;
    Some(extent.bounds(*position))
}

/// Move an entity. Returns false if it is gone.
pub fn place(world: &mut World, entity: Entity, x: f32, y: f32) -> bool {
    match world.get_mut::<MapPosition>(entity) {
        Some(mut position) => {
            position.x = x;
            position.y = y;
            true
        }
        None => false,
    }
}

pub fn position_of(world: &World, entity: Entity) -> Option<MapPosition> {
    world.get::<MapPosition>(entity).copied()
}
