//! Loose feathers fired out of a crash. Each one is simulated on its own and
//! removes itself once it has fallen below the screen.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::extent::Extent;
use crate::components::feather::Feather;
use crate::components::rotation::Rotation;
use crate::components::sprite::Rect;
use crate::stage::Stage;
use crate::systems::bird::BIRD_SHEET;
use crate::systems::entity::{EntityConfig, base_update, destroy, place, position_of, spawn_entity};

const FEATHER_RECT: Rect = Rect::new(160.0, 0.0, 40.0, 47.0);
const SWAY_STEP: f32 = 0.04;

/// Spawn a feather at `(x, y)` moving with `(vx, vy)`.
pub fn spawn_feather(stage: &mut Stage, x: f32, y: f32, vx: f32, vy: f32, z_index: i32) -> Entity {
    // two feather shapes stacked in the sheet
    let rect = if stage.rng.bool() {
        FEATHER_RECT
    } else {
        Rect {
            y: FEATHER_RECT.height,
            ..FEATHER_RECT
        }
    };
    let feather = Feather {
        vx,
        vy,
        dvx: stage.random(0.1, 0.3),
        dvy: stage.random(0.09, 0.18),
        max_vy: stage.random(1.5, 2.5),
        dr: stage.random(180.0, 360.0),
        ddr: stage.random(0.9, 0.98),
        t: stage.random(0.0, 360.0),
        wt: SWAY_STEP,
        amplitude: stage.random(10.0, 20.0),
    };
    let rotation = stage.random(0.0, 360.0);
    let entity = spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_sprite(BIRD_SHEET, rect)
            .with_origin(0.5, 0.5)
            .with_rotation(rotation)
            .with_zindex(z_index),
        update_feather,
    );
    stage.world.entity_mut(entity).insert(feather);
    entity
}

/// Burst of `count` feathers fired radially from `(x, y)`.
pub fn spawn_feather_burst(stage: &mut Stage, x: f32, y: f32, count: u32) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let angle = (360.0 / count as f32 * (i + 1) as f32).to_radians();
            let vx = stage.random(15.0, 40.0) * angle.cos();
            let vy = stage.random(8.0, 15.0) * angle.sin();
            let z = if stage.rng.bool() { 10 } else { 0 };
            spawn_feather(stage, x, y, vx, vy, z)
        })
        .collect()
}

pub fn update_feather(stage: &mut Stage, entity: Entity) {
    let (Some(position), Some(mut f)) = (
        position_of(&stage.world, entity),
        stage.world.get::<Feather>(entity).copied(),
    ) else {
        return;
    };
    let height = stage.world.get::<Extent>(entity).map(|e| e.height).unwrap_or(0.0);

    f.t += f.wt;
    let x = position.x + f.vx + 0.3 * f.amplitude * f.t.sin();
    let y = position.y + f.vy;
    f.vx *= f.dvx;
    f.vy = f.max_vy.min(f.vy + f.dvy);
    let rotation = f.amplitude * f.t.cos() - 135.0 + f.dr;
    f.dr *= f.ddr;

    place(&mut stage.world, entity, x, y);
    if let Some(mut r) = stage.world.get_mut::<Rotation>(entity) {
        r.degrees = rotation;
    }
    if let Some(mut stored) = stage.world.get_mut::<Feather>(entity) {
        *stored = f;
    }

    if y > stage.screen().h + height {
        trace!("feather {:?} fell off screen", entity);
        destroy(stage, entity);
        return;
    }
    base_update(stage, entity);
}
