//! Obstacles: a top and a bottom pipe around a gap, each with a wires
//! overlay that sparks while the death sequence runs.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::pipe::{Pipe, Placement, Wires};
use crate::components::scale::Scale;
use crate::components::sprite::{Rect, Sprite};
use crate::resources::gamestate::ObstaclePair;
use crate::stage::Stage;
use crate::systems::easing::approach;
use crate::systems::entity::{EntityConfig, base_update, spawn_entity};

pub const PIPE_WIDTH: f32 = 280.0;
pub const PIPE_HEIGHT: f32 = 1102.0;
pub const PIPE_SHAPES: i32 = 4;
pub const WIRES_SHAPES: i32 = 2;
/// Frames per wires shape: one calm frame and three sparking ones.
const WIRES_FRAMES: u32 = 4;
const JITTER_LAG: f32 = 3.0;
const SETTLE_LAG: f32 = 21.0;

fn sheet_for(placement: Placement, top: &'static str, bottom: &'static str) -> &'static str {
    match placement {
        Placement::Top => top,
        Placement::Bottom => bottom,
    }
}

/// Config for either overlay layer. Top parts hang from their position,
/// bottom parts stand on it.
fn obstacle_config(x: f32, y: f32, placement: Placement, sheet: &'static str) -> EntityConfig {
    let origin_y = match placement {
        Placement::Top => 0.0,
        Placement::Bottom => 1.0,
    };
    EntityConfig::default()
        .with_position(x, y)
        .with_sprite(sheet, Rect::new(0.0, 0.0, PIPE_WIDTH, PIPE_HEIGHT))
        .with_origin(0.5, origin_y)
}

pub fn spawn_pipe(stage: &mut Stage, x: f32, y: f32, placement: Placement, shape: u32) -> Entity {
    let sheet = sheet_for(placement, "pipes-top.png", "pipes-bottom.png");
    let entity = spawn_entity(stage, obstacle_config(x, y, placement, sheet), update_pipe);
    stage.world.entity_mut(entity).insert(Pipe { placement, shape });
    entity
}

pub fn spawn_wires(stage: &mut Stage, x: f32, y: f32, placement: Placement, shape: u32) -> Entity {
    let sheet = sheet_for(placement, "wires-top.png", "wires-bottom.png");
    let entity = spawn_entity(stage, obstacle_config(x, y, placement, sheet), update_wires);
    stage.world.entity_mut(entity).insert(Wires {
        placement,
        shape,
        zap: false,
        tx: 0.0,
        ty: 0.0,
    });
    entity
}

/// Spawn a pipe pair just past the right edge, with the gap of height
/// `gap` centred on `center`.
pub fn spawn_obstacle_pair(stage: &mut Stage, center: f32, gap: f32) -> ObstaclePair {
    let x = stage.screen().w + PIPE_WIDTH;
    let top_y = center - PIPE_HEIGHT - 0.5 * gap;
    let bottom_y = center + PIPE_HEIGHT + 0.5 * gap;

    let shape = stage.irandom(0, PIPE_SHAPES - 1) as u32;
    let top = spawn_pipe(stage, x, top_y, Placement::Top, shape);
    let shape = stage.irandom(0, WIRES_SHAPES - 1) as u32;
    let top_wires = spawn_wires(stage, x, top_y, Placement::Top, shape);
    let shape = stage.irandom(0, PIPE_SHAPES - 1) as u32;
    let bottom = spawn_pipe(stage, x, bottom_y, Placement::Bottom, shape);
    let shape = stage.irandom(0, WIRES_SHAPES - 1) as u32;
    let bottom_wires = spawn_wires(stage, x, bottom_y, Placement::Bottom, shape);

    debug!("obstacle pair at x={} gap {:.0} centred on {:.0}", x, gap, center);
    ObstaclePair {
        top,
        bottom,
        top_wires,
        bottom_wires,
        passed: false,
    }
}

pub fn update_pipe(stage: &mut Stage, entity: Entity) {
    let shape = stage.world.get::<Pipe>(entity).map(|p| p.shape);
    if let Some(shape) = shape {
        if let Some(mut sprite) = stage.world.get_mut::<Sprite>(entity) {
            sprite.rect.x = shape as f32 * sprite.rect.width;
        }
    }
    base_update(stage, entity);
}

pub fn update_wires(stage: &mut Stage, entity: Entity) {
    let Some(mut wires) = stage.world.get::<Wires>(entity).copied() else {
        return;
    };
    let mut column = wires.shape * WIRES_FRAMES;
    if wires.zap {
        let (jx, jy) = (stage.random(-0.03, 0.03), stage.random(-0.0015, 0.0025));
        wires.tx = approach(wires.tx, jx, JITTER_LAG);
        wires.ty = approach(wires.ty, jy, JITTER_LAG);
        column += stage.irandom(1, WIRES_FRAMES as i32 - 1) as u32;
    } else {
        wires.tx = approach(wires.tx, 0.0, SETTLE_LAG);
        wires.ty = approach(wires.ty, 0.0, SETTLE_LAG);
    }

    if let Some(mut sprite) = stage.world.get_mut::<Sprite>(entity) {
        sprite.rect.x = column as f32 * sprite.rect.width;
    }
    if let Some(mut scale) = stage.world.get_mut::<Scale>(entity) {
        scale.x = 1.0 + wires.tx;
        scale.y = 1.0 + wires.ty;
    }
    if let Some(mut stored) = stage.world.get_mut::<Wires>(entity) {
        *stored = wires;
    }
    base_update(stage, entity);
}

/// Start or stop sparking. Ignored if the wires are gone.
pub fn set_zap(world: &mut World, wires: Entity, zap: bool) {
    if let Some(mut w) = world.get_mut::<Wires>(wires) {
        w.zap = zap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::FRAME_MS;
    use crate::systems::entity::bounds_of;

    #[test]
    fn test_pair_leaves_requested_gap() {
        let mut stage = Stage::headless(1600.0, 1800.0, 2);
        let pair = spawn_obstacle_pair(&mut stage, 900.0, 440.0);
        let top = bounds_of(&stage.world, pair.top).unwrap();
        let bottom = bounds_of(&stage.world, pair.bottom).unwrap();
        assert_eq!(top.bottom, 680.0);
        assert_eq!(bottom.top, 1120.0);
        assert_eq!(top.left, 1600.0 + PIPE_WIDTH - 0.5 * PIPE_WIDTH);
        assert!(!pair.passed);
        assert_eq!(
            stage.world.get::<Sprite>(pair.top_wires).unwrap().key,
            "wires-top.png"
        );
    }

    #[test]
    fn test_wires_spark_then_settle() {
        let mut stage = Stage::headless(1600.0, 1800.0, 2);
        let wires = spawn_wires(&mut stage, 500.0, 0.0, Placement::Top, 1);
        stage.run_frame(FRAME_MS);
        assert_eq!(stage.world.get::<Sprite>(wires).unwrap().rect.x, 4.0 * PIPE_WIDTH);

        set_zap(&mut stage.world, wires, true);
        for _ in 0..10 {
            stage.run_frame(FRAME_MS);
            let x = stage.world.get::<Sprite>(wires).unwrap().rect.x;
            assert!([5.0, 6.0, 7.0].contains(&(x / PIPE_WIDTH)));
        }

        set_zap(&mut stage.world, wires, false);
        for _ in 0..300 {
            stage.run_frame(FRAME_MS);
        }
        let scale = *stage.world.get::<Scale>(wires).unwrap();
        assert!((scale.x - 1.0).abs() < 1e-4);
        assert!((scale.y - 1.0).abs() < 1e-4);
        assert_eq!(stage.world.get::<Sprite>(wires).unwrap().rect.x, 4.0 * PIPE_WIDTH);
    }

    #[test]
    fn test_pipe_shape_picks_column() {
        let mut stage = Stage::headless(1600.0, 1800.0, 2);
        let pipe = spawn_pipe(&mut stage, 500.0, 0.0, Placement::Bottom, 3);
        stage.run_frame(FRAME_MS);
        assert_eq!(stage.world.get::<Sprite>(pipe).unwrap().rect.x, 3.0 * PIPE_WIDTH);
    }
}
