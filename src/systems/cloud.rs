//! Background clouds. Nearer clouds (higher depth) are bigger and more
//! opaque; all of them breathe slowly. Horizontal drift belongs to the game.

use bevy_ecs::prelude::*;

use crate::components::cloud::Cloud;
use crate::components::opacity::Opacity;
use crate::components::scale::Scale;
use crate::components::sprite::{Rect, Sprite};
use crate::stage::Stage;
use crate::systems::entity::{EntityConfig, base_update, spawn_entity};

pub const CLOUD_SHEET: &str = "clouds.png";
pub const CLOUD_WIDTH: f32 = 280.0;
pub const CLOUD_HEIGHT: f32 = 140.0;
pub const CLOUD_SHAPES: u32 = 4;
const CLOUD_Z: i32 = -2;
const BREATH_STEP: f32 = 0.05;

pub fn spawn_cloud(stage: &mut Stage, x: f32, y: f32, depth: f32, shape: u32) -> Entity {
    let t = stage.random(0.0, 10.0);
    let entity = spawn_entity(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_sprite(CLOUD_SHEET, Rect::new(0.0, 0.0, CLOUD_WIDTH, CLOUD_HEIGHT))
            .with_origin(0.5, 0.5)
            .with_scale(depth, depth)
            .with_zindex(CLOUD_Z),
        update_cloud,
    );
    stage.world.entity_mut(entity).insert(Cloud {
        depth,
        shape: shape.min(CLOUD_SHAPES - 1),
        t,
    });
    entity
}

pub fn update_cloud(stage: &mut Stage, entity: Entity) {
    let Some(mut cloud) = stage.world.get_mut::<Cloud>(entity) else {
        return;
    };
    cloud.t += BREATH_STEP;
    let Cloud { depth, shape, t } = *cloud;

    let sx = depth * (1.0 + 0.08 * t.sin());
    if let Some(mut scale) = stage.world.get_mut::<Scale>(entity) {
        scale.x = sx;
        scale.y = depth + 0.75 * (depth - sx);
    }
    if let Some(mut opacity) = stage.world.get_mut::<Opacity>(entity) {
        opacity.0 = (1.5 * depth).min(1.0);
    }
    if let Some(mut sprite) = stage.world.get_mut::<Sprite>(entity) {
        sprite.rect.y = shape as f32 * sprite.rect.height;
    }
    base_update(stage, entity);
}
