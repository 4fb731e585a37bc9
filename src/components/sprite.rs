use bevy_ecs::prelude::Component;

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Sprite sheet reference: an image key and the source rectangle to blit.
///
/// `base` is the rectangle the sprite was created with. Frame playback
/// offsets `rect` from it; per-kind logic may also move `rect` along the
/// other axis to pick a variant.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub key: String,
    pub rect: Rect,
    pub base: Rect,
}

impl Sprite {
    pub fn new(key: impl Into<String>, rect: Rect) -> Self {
        Self {
            key: key.into(),
            rect,
            base: rect,
        }
    }
}
