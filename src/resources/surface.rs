//! Drawing surface capability.
//!
//! Everything the runtime draws goes through [`Surface`]: a 2D canvas with a
//! save/restore transform stack, global alpha, image blits and a few debug
//! primitives. Hosts either implement it directly or replay a recorded
//! [`DrawList`](super::drawlist::DrawList).

use crate::components::sprite::Rect;

/// 8-bit RGB color with a float alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }
}

/// 2D canvas with a transform stack.
///
/// Transforms compose in call order, like an HTML canvas: `translate` then
/// `rotate` rotates around the translated point.
pub trait Surface {
    /// Play-field size in pixels.
    fn size(&self) -> (f32, f32);
    /// Wipe `region`. Also resets the transform stack.
    fn clear(&mut self, region: Rect);
    fn save(&mut self);
    fn restore(&mut self);
    /// Alpha multiplied into everything drawn until the next `restore`.
    fn set_alpha(&mut self, alpha: f32);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, degrees: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Blit the `src` region of image `key` into `dst`.
    fn draw_image(&mut self, key: &str, src: Rect, dst: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, color: Rgba);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_long_and_short() {
        assert_eq!(Rgba::from_hex("#d9d9d9"), Some(Rgba::rgb(0xd9, 0xd9, 0xd9)));
        assert_eq!(Rgba::from_hex("f0f0f0"), Some(Rgba::rgb(0xf0, 0xf0, 0xf0)));
        assert_eq!(Rgba::from_hex("#f00"), Some(Rgba::RED));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
        assert_eq!(Rgba::from_hex(""), None);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(2.0).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-1.0).a, 0.0);
    }
}
