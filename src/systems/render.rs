//! Per-entity rendering.
//!
//! Each entity's render listener runs at its z-index priority, so the bus
//! already sorts draws back to front. Drawing happens in the entity's local
//! frame: origin at the pivot, rotated and scaled around it.

use bevy_ecs::prelude::*;

use crate::components::debugoverlay::DebugOverlay;
use crate::components::extent::Extent;
use crate::components::hooks::EntityHooks;
use crate::components::mapposition::MapPosition;
use crate::components::opacity::Opacity;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::{Rect, Sprite};
use crate::resources::surface::Surface;
use crate::resources::texturestore::ImageStatus;
use crate::stage::Stage;

/// Radius of the debug origin marker.
const ORIGIN_MARKER_RADIUS: f32 = 5.0;

/// Draw one entity onto the stage surface.
///
/// Sequence: save, alpha, translate to the position, rotate, scale, blit the
/// sprite (once its image is ready), run `on_draw`, draw debug overlays,
/// restore, then run `on_render`.
pub fn render_entity(stage: &mut Stage, entity: Entity) {
    let Stage {
        world,
        surface,
        textures,
        ..
    } = stage;
    let Ok(e) = world.get_entity(entity) else {
        return;
    };
    let (Some(position), Some(extent)) = (e.get::<MapPosition>(), e.get::<Extent>()) else {
        return;
    };
    let rotation = e.get::<Rotation>().map(|r| r.degrees).unwrap_or(0.0);
    let scale = e.get::<Scale>().copied().unwrap_or_default();
    let opacity = e.get::<Opacity>().map(|o| o.0).unwrap_or(1.0);
    let overlay = e.get::<DebugOverlay>().copied().unwrap_or_default();
    let hooks = e.get::<EntityHooks>();
    let on_draw = hooks.and_then(|h| h.on_draw.clone());
    let on_render = hooks.and_then(|h| h.on_render.clone());

    let local = Rect::new(-extent.offset_x(), -extent.offset_y(), extent.width, extent.height);

    surface.save();
    surface.set_alpha(opacity);
    surface.translate(position.x, position.y);
    surface.rotate(rotation);
    surface.scale(scale.x, scale.y);

    if let Some(sprite) = e.get::<Sprite>() {
        if textures.status(&sprite.key) == ImageStatus::Ready {
            surface.draw_image(&sprite.key, sprite.rect, local);
        }
    }
    if let Some(draw) = on_draw {
        draw(&mut *surface, &*world, entity);
    }
    if overlay.show_origin {
        surface.fill_circle(0.0, 0.0, ORIGIN_MARKER_RADIUS, overlay.origin_color);
    }
    if overlay.show_bounds {
        surface.stroke_rect(local, overlay.bounds_color);
    }
    surface.restore();

    if let Some(hook) = on_render {
        hook(stage, entity);
    }
}
