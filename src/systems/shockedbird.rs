//! Electrocuted bird: a looping six-frame sheet that jitters in scale and
//! flickers between three sheet columns.

use bevy_ecs::prelude::*;

use crate::components::animation::FramePlayback;
use crate::components::scale::Scale;
use crate::components::shockedbird::ShockedBird;
use crate::components::sprite::{Rect, Sprite};
use crate::stage::Stage;
use crate::systems::animation::{advance_playback, spawn_animated};
use crate::systems::entity::{EntityConfig, base_update};

pub const SHOCKED_SHEET: &str = "bird-shocked.png";
const SIZE: f32 = 200.0;
const FRAMES: u32 = 6;
const FPS: f64 = 24.0;
const COLUMNS: i32 = 3;

pub fn spawn_shocked_bird(stage: &mut Stage, x: f32, y: f32) -> Entity {
    let entity = spawn_animated(
        stage,
        EntityConfig::default()
            .with_position(x, y)
            .with_sprite(SHOCKED_SHEET, Rect::new(0.0, 0.0, SIZE, SIZE))
            .with_origin(0.5, 0.5),
        FramePlayback::new(FRAMES, FPS).looped(),
        update_shocked_bird,
    );
    stage.world.entity_mut(entity).insert(ShockedBird { counter: 0 });
    entity
}

pub fn update_shocked_bird(stage: &mut Stage, entity: Entity) {
    advance_playback(stage, entity);

    let (sx, sy) = (stage.random(0.95, 1.05), stage.random(0.95, 1.05));
    if let Some(mut scale) = stage.world.get_mut::<Scale>(entity) {
        scale.x = sx;
        scale.y = sy;
    }

    let counter = stage.world.get::<ShockedBird>(entity).map(|s| s.counter);
    match counter {
        Some(c) if c <= 0 => {
            let next = stage.irandom(5, 15);
            let column = stage.irandom(0, COLUMNS - 1) as f32;
            if let Some(mut shocked) = stage.world.get_mut::<ShockedBird>(entity) {
                shocked.counter = next;
            }
            if let Some(mut sprite) = stage.world.get_mut::<Sprite>(entity) {
                sprite.rect.x = column * SIZE;
            }
        }
        Some(_) => {
            if let Some(mut shocked) = stage.world.get_mut::<ShockedBird>(entity) {
                shocked.counter -= 1;
            }
        }
        None => {}
    }

    base_update(stage, entity);
}
