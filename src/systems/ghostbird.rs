//! The ghost that rises out of a crash.
//!
//! It pops in with elastic tweens, drifts upwards with a flap every 1.5 s
//! and destroys itself once it has left the top of the screen.

use bevy_ecs::prelude::*;
use log::{trace, warn};
use smallvec::SmallVec;

use crate::components::ghostbird::{GhostAnatomy, GhostBird};
use crate::components::parts::Parts;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::Rect;
use crate::components::tween::{Property, PropertyTween, TweenSettings};
use crate::stage::Stage;
use crate::systems::easing::{Easing, approach};
use crate::systems::entity::{EntityConfig, base_update, destroy, place, position_of, spawn_entity};
use crate::systems::tween::animate;

pub const GHOST_SHEET: &str = "bird-ghost.png";
const SIZE: f32 = 200.0;
const INITIAL_VY: f32 = -1.0;
const BUOYANCY: f32 = 0.1;
const FLAP_VY: f32 = -8.0;
const FIRST_FLAP_MS: f64 = 700.0;
const FLAP_EVERY_MS: f64 = 1500.0;
const LAG: f32 = 5.0;
const WING_SCALE: f32 = 1.25;

fn part(stage: &mut Stage, config: EntityConfig) -> Entity {
    spawn_entity(stage, config, base_update)
}

pub fn spawn_ghost_bird(stage: &mut Stage, x: f32, y: f32) -> Entity {
    let ghost = spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_size(SIZE, SIZE)
            .with_origin(0.5, 0.5),
        update_ghost_bird,
    );

    let sheet = |rect: Rect| EntityConfig::default().with_position(x, y).with_sprite(GHOST_SHEET, rect);
    let ring_top = part(
        stage,
        sheet(Rect::new(110.0, 90.0, 75.0, 10.0)).with_origin(0.5, 1.0).with_zindex(4),
    );
    let ring_bottom = part(
        stage,
        sheet(Rect::new(110.0, 100.0, 75.0, 11.0)).with_origin(0.5, 0.0).with_zindex(6),
    );
    let body = part(
        stage,
        sheet(Rect::new(0.0, 0.0, 100.0, 120.0))
            .with_origin(0.5, 0.5)
            .with_scale(0.0, 0.0)
            .with_zindex(5),
    );
    let wing = |facing: f32| {
        sheet(Rect::new(110.0, 0.0, 100.0, 72.0))
            .with_origin(1.0, 1.0)
            .with_scale(facing * WING_SCALE, WING_SCALE)
            .with_opacity(0.95)
            .with_zindex(4)
    };
    let wing_right = part(stage, wing(-1.0));
    let wing_left = part(stage, wing(1.0));

    let anatomy = GhostAnatomy {
        ring_top,
        ring_bottom,
        body,
        wing_right,
        wing_left,
    };
    stage.world.entity_mut(ghost).insert((
        GhostBird {
            vy: INITIAL_VY,
            anatomy,
        },
        Parts(anatomy.all().into_iter().collect::<SmallVec<_>>()),
    ));

    stage.schedule(Some(ghost), FIRST_FLAP_MS, move |stage| ghost_flap(stage, ghost));
    pop_in(stage, anatomy);
    ghost
}

fn ghost_flap(stage: &mut Stage, ghost: Entity) {
    match stage.world.get_mut::<GhostBird>(ghost) {
        Some(mut g) => g.vy = FLAP_VY,
        None => return,
    }
    stage.schedule(Some(ghost), FLAP_EVERY_MS, move |stage| ghost_flap(stage, ghost));
}

fn pop_in(stage: &mut Stage, anatomy: GhostAnatomy) {
    let elastic = TweenSettings::default().with_easing(Easing::OutElastic);
    let body = [
        (Property::ScaleX, PropertyTween::to(1.0).with_duration(600.0)),
        (Property::ScaleY, PropertyTween::to(1.0).with_duration(400.0)),
    ];
    if let Err(err) = animate(stage, anatomy.body, body, &elastic) {
        warn!("ghost pop-in failed: {}", err);
    }

    let unfold = TweenSettings::default()
        .with_easing(Easing::InOutCubic)
        .with_duration(600.0)
        .with_delay(300.0);
    for (wing, facing) in [(anatomy.wing_right, -1.0), (anatomy.wing_left, 1.0)] {
        let spread = [
            (Property::ScaleX, PropertyTween::from_to(0.0, facing * WING_SCALE)),
            (Property::ScaleY, PropertyTween::from_to(0.0, WING_SCALE)),
        ];
        if let Err(err) = animate(stage, wing, spread, &unfold) {
            warn!("ghost wing unfold failed: {}", err);
        }
    }
}

pub fn update_ghost_bird(stage: &mut Stage, entity: Entity) {
    let Some(origin) = position_of(&stage.world, entity) else {
        return;
    };
    let Some(mut ghost) = stage.world.get::<GhostBird>(entity).copied() else {
        return;
    };
    let parts = ghost.anatomy;
    let (x, y) = (origin.x, origin.y + ghost.vy);
    let dy = y - origin.y;
    ghost.vy += BUOYANCY;

    let world = &mut stage.world;
    place(world, entity, x, y);
    if let Some(mut g) = world.get_mut::<GhostBird>(entity) {
        g.vy = ghost.vy;
    }

    if let Some(mut scale) = world.get_mut::<Scale>(parts.body) {
        scale.y = approach(scale.y, 1.0 - 0.035 * dy, LAG);
        scale.x = approach(scale.x, 2.0 - scale.y, LAG);
    }

    let ring_y = position_of(world, parts.ring_top).map(|p| p.y).unwrap_or(y);
    let ring_y = approach(ring_y, y - 90.0 - 0.25 * dy, LAG);
    place(world, parts.ring_top, x, ring_y);
    place(world, parts.ring_bottom, x, ring_y);
    place(world, parts.body, x, y);

    place(world, parts.wing_right, x - 10.0, y - 20.0);
    if let Some(mut r) = world.get_mut::<Rotation>(parts.wing_right) {
        r.degrees = approach(r.degrees, (-17.0 * dy).max(-30.0), LAG);
    }
    place(world, parts.wing_left, x + 10.0, y - 20.0);
    if let Some(mut r) = world.get_mut::<Rotation>(parts.wing_left) {
        r.degrees = approach(r.degrees, (17.0 * dy).min(30.0), LAG);
    }

    if y < -SIZE {
        trace!("ghost {:?} left the screen", entity);
        destroy(stage, entity);
        return;
    }
    base_update(stage, entity);
}
