//! The player character: nine sprite parts driven by one body.
//!
//! The body itself draws nothing; every frame it integrates its velocity and
//! places each part at a fixed offset, letting the tail, feet and wing trail
//! the motion through exponential smoothing. The facing direction mirrors
//! all horizontal offsets.

use bevy_ecs::prelude::*;
use log::warn;
use smallvec::SmallVec;

use crate::components::bird::{Bird, BirdAnatomy, BirdRig};
use crate::components::animation::FramePlayback;
use crate::components::mapposition::MapPosition;
use crate::components::parts::Parts;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::Rect;
use crate::components::tween::{Property, PropertyTween, TweenSettings};
use crate::stage::Stage;
use crate::systems::animation::{control, spawn_animated, update_animated};
use crate::systems::easing::approach;
use crate::systems::entity::{EntityConfig, base_update, place, position_of, spawn_entity};
use crate::systems::tween::animate;

pub const BIRD_SHEET: &str = "bird-sprite.png";
pub const BIRD_WIDTH: f32 = 100.0;
pub const BIRD_HEIGHT: f32 = 120.0;

const DEFAULT_STRENGTH: f32 = 20.0;
const DEFAULT_WEIGHT: f32 = 1.1;
const DEFAULT_PUPIL_DX: f32 = 8.0;

const BLINK_CLOSE_MS: f32 = 40.0;
const BLINK_OPEN_MS: f32 = 80.0;
const LOOK_MS: f32 = 80.0;

// part offsets from the body, for a bird facing right
const BEAK: (f32, f32) = (40.0, -44.0);
const TAIL_OUTER: (f32, f32) = (-44.0, 14.0);
const TAIL_INNER: (f32, f32) = (-40.0, 22.0);
const FEET_INNER: (f32, f32) = (0.0, 55.0);
const FEET_OUTER: (f32, f32) = (0.0, 60.0);
const EYE: (f32, f32) = (28.0, -30.0);
const PUPIL: (f32, f32) = (30.0, -30.0);
const WING: (f32, f32) = (-20.0, 10.0);

fn part(stage: &mut Stage, x: f32, y: f32, rect: Rect, origin: (f32, f32)) -> Entity {
    spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_sprite(BIRD_SHEET, rect)
            .with_origin(origin.0, origin.1)
            .with_zindex(1),
        base_update,
    )
}

/// Spawn a bird facing right at `(x, y)`.
pub fn spawn_bird(stage: &mut Stage, x: f32, y: f32) -> Entity {
    let bird = spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_size(BIRD_WIDTH, BIRD_HEIGHT)
            .with_origin(0.5, 0.5),
        update_bird,
    );

    let beak = part(stage, x, y, Rect::new(100.0, 50.0, 40.0, 70.0), (0.0, 0.0));
    let tail_outer = part(stage, x, y, Rect::new(160.0, 0.0, 40.0, 47.0), (1.0, 0.0));
    let tail_inner = part(stage, x, y, Rect::new(160.0, 47.0, 40.0, 47.0), (1.0, 0.0));
    let feet_inner = part(stage, x, y, Rect::new(180.0, 100.0, 40.0, 20.0), (0.5, 0.0));
    let body = part(stage, x, y, Rect::new(0.0, 0.0, 100.0, 120.0), (0.5, 0.5));
    let feet_outer = part(stage, x, y, Rect::new(140.0, 100.0, 40.0, 20.0), (0.5, 0.0));
    let eye = part(stage, x, y, Rect::new(100.0, 0.0, 35.0, 50.0), (0.5, 0.5));
    let pupil = part(stage, x, y, Rect::new(140.0, 0.0, 8.0, 10.0), (0.5, 0.5));
    let wing = spawn_animated(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_sprite(BIRD_SHEET, Rect::new(200.0, 0.0, 70.0, 50.0))
            .with_origin(0.5, 1.0)
            .with_zindex(1),
        FramePlayback::new(2, 10.0).paused(),
        update_animated,
    );

    let anatomy = BirdAnatomy {
        beak,
        tail_outer,
        tail_inner,
        feet_inner,
        body,
        feet_outer,
        eye,
        pupil,
        wing,
    };
    stage.world.entity_mut(bird).insert((
        Bird {
            dir: 1.0,
            vx: 0.0,
            vy: 0.0,
            strength: DEFAULT_STRENGTH,
            weight: DEFAULT_WEIGHT,
            wing_flap: 0.0,
            pupil_dx: DEFAULT_PUPIL_DX,
            pupil_dy: 0.0,
            rig: BirdRig::default(),
            anatomy,
        },
        Parts(anatomy.all().into_iter().collect::<SmallVec<_>>()),
    ));
    bird
}

fn rotation_of(world: &World, entity: Entity) -> f32 {
    world.get::<Rotation>(entity).map(|r| r.degrees).unwrap_or(0.0)
}

fn set_rotation(world: &mut World, entity: Entity, degrees: f32) {
    if let Some(mut r) = world.get_mut::<Rotation>(entity) {
        r.degrees = degrees;
    }
}

fn set_scale(world: &mut World, entity: Entity, x: f32, y: f32) {
    if let Some(mut s) = world.get_mut::<Scale>(entity) {
        s.x = x;
        s.y = y;
    }
}

/// Integrate velocity and pose every part.
pub fn update_bird(stage: &mut Stage, entity: Entity) {
    let Some(origin) = position_of(&stage.world, entity) else {
        return;
    };
    let Some(mut bird) = stage.world.get::<Bird>(entity).cloned() else {
        return;
    };
    let (dir, rig, parts) = (bird.dir, bird.rig, bird.anatomy);

    let x = origin.x + dir * bird.vx;
    let y = origin.y + bird.vy;
    bird.vy += bird.weight;
    let dy = y - origin.y;

    let world = &mut stage.world;
    let at = |offset: (f32, f32)| (x + offset.0 * dir, y + offset.1);

    let (bx, by) = at(BEAK);
    place(world, parts.beak, bx, by);

    let (tx, ty) = at(TAIL_OUTER);
    place(world, parts.tail_outer, tx, ty);
    set_rotation(world, parts.tail_outer, rig.tail_outer_gain * (dir * dy + dir));

    let (tx, ty) = at(TAIL_INNER);
    place(world, parts.tail_inner, tx, ty);
    let r = rotation_of(world, parts.tail_inner);
    set_rotation(world, parts.tail_inner, approach(r, rig.tail_inner_gain * dir * dy, rig.part_lag));

    let (fx, fy) = at(FEET_INNER);
    place(world, parts.feet_inner, fx, fy);
    let r = rotation_of(world, parts.feet_inner);
    let target = rig.feet_inner_gain * dir * (dy - rig.feet_inner_bias);
    set_rotation(world, parts.feet_inner, approach(r, target, rig.part_lag));

    place(world, parts.body, x, y);

    let (fx, fy) = at(FEET_OUTER);
    place(world, parts.feet_outer, fx, fy);
    let r = rotation_of(world, parts.feet_outer);
    let target = rig.feet_outer_gain * dir * (dy - rig.feet_outer_bias);
    set_rotation(world, parts.feet_outer, approach(r, target, rig.part_lag));

    let (ex, ey) = at(EYE);
    place(world, parts.eye, ex, ey);
    let (px, py) = at(PUPIL);
    place(world, parts.pupil, px + bird.pupil_dx, py + bird.pupil_dy);

    bird.wing_flap = (bird.wing_flap * rig.flap_decay).max(0.0);
    let (wx, wy) = at(WING);
    place(world, parts.wing, wx, wy);
    set_rotation(world, parts.wing, (2.0 * dir * dy).clamp(-25.0, 25.0) - 15.0 * dir);
    let wing_scale_y = world.get::<Scale>(parts.wing).map(|s| s.y).unwrap_or(1.0);
    let squash = (0.25 * (4.0 + dy + bird.wing_flap)).clamp(-1.25, 1.25);
    let wing_scale_y = approach(wing_scale_y, squash, rig.wing_lag);
    set_scale(world, parts.wing, dir, wing_scale_y);

    // the pupil keeps its own facing
    for p in [
        parts.beak,
        parts.tail_outer,
        parts.tail_inner,
        parts.feet_inner,
        parts.body,
        parts.feet_outer,
        parts.eye,
    ] {
        if let Some(mut s) = world.get_mut::<Scale>(p) {
            s.x = dir;
        }
    }

    place(world, entity, x, y);
    if let Some(mut stored) = world.get_mut::<Bird>(entity) {
        stored.vy = bird.vy;
        stored.wing_flap = bird.wing_flap;
    }

    let frame = if wing_scale_y > 0.0 { 0 } else { 1 };
    control(stage, parts.wing, |p| p.goto(frame));
    base_update(stage, entity);
}

/// Kick upwards. `strength` defaults to the bird's own.
pub fn flap(stage: &mut Stage, entity: Entity, strength: Option<f32>) {
    if let Some(mut bird) = stage.world.get_mut::<Bird>(entity) {
        let s = strength.unwrap_or(bird.strength);
        bird.wing_flap = bird.rig.flap_impulse * s;
        bird.vy = -s;
    }
}

/// Close and reopen the eye.
pub fn blink(stage: &mut Stage, entity: Entity) {
    let Some(anatomy) = stage.world.get::<Bird>(entity).map(|b| b.anatomy) else {
        return;
    };
    for (part, close_ms) in [(anatomy.eye, BLINK_CLOSE_MS), (anatomy.pupil, BLINK_OPEN_MS)] {
        let reopen = TweenSettings::default().with_duration(BLINK_OPEN_MS);
        let settings = TweenSettings::default()
            .with_duration(close_ms)
            .with_on_complete(move |stage| {
                if let Err(err) = animate(stage, part, [(Property::ScaleY, PropertyTween::to(1.0))], &reopen) {
                    warn!("blink reopen failed: {}", err);
                }
            });
        if let Err(err) = animate(stage, part, [(Property::ScaleY, PropertyTween::to(0.0))], &settings) {
            warn!("blink failed: {}", err);
        }
    }
}

/// Point the pupil towards `(x, y)`.
pub fn look_at(stage: &mut Stage, entity: Entity, x: f32, y: f32) {
    let Some(MapPosition { x: bx, y: by }) = position_of(&stage.world, entity) else {
        return;
    };
    let dx = (0.1 * (x - bx)).clamp(-10.0, 9.0);
    let dy = (0.1 * (y - by)).clamp(-10.0, 10.0);
    let settings = TweenSettings::default().with_duration(LOOK_MS);
    if let Err(err) = animate(
        stage,
        entity,
        [
            (Property::PupilDx, PropertyTween::to(dx)),
            (Property::PupilDy, PropertyTween::to(dy)),
        ],
        &settings,
    ) {
        warn!("look_at failed: {}", err);
    }
}
