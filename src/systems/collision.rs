//! Forgiving collision between the character and obstacles.
//!
//! The character's bounding box is far bigger than its silhouette, so it is
//! replaced by three smaller regions (head, belly, beak) carved out of it.
//! Obstacles are trimmed horizontally for the same reason. A hit is a strict
//! overlap of any region with the trimmed obstacle box.

use crate::components::extent::Bounds;

/// Fractions of the character size used to carve its hit regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxInsets {
    pub head_left: f32,
    pub head_right: f32,
    pub head_bottom: f32,
    pub belly_left: f32,
    pub belly_right: f32,
    pub belly_top: f32,
    pub belly_bottom: f32,
    pub beak_reach: f32,
    pub beak_top: f32,
    pub beak_height: f32,
    pub obstacle_left: f32,
    pub obstacle_right: f32,
}

impl Default for HitboxInsets {
    fn default() -> Self {
        Self {
            head_left: 0.5,
            head_right: 0.1,
            head_bottom: 0.25,
            belly_left: 0.05,
            belly_right: 0.15,
            belly_top: 0.5,
            belly_bottom: 0.05,
            beak_reach: 0.3,
            beak_top: 0.3,
            beak_height: 0.25,
            obstacle_left: 0.15,
            obstacle_right: 0.1,
        }
    }
}

impl HitboxInsets {
    /// Head, belly and beak regions for a character of size `w` x `h`.
    pub fn character(&self, b: Bounds, w: f32, h: f32) -> [Bounds; 3] {
        let head = Bounds {
            left: b.left + self.head_left * w,
            right: b.right - self.head_right * w,
            bottom: b.bottom - self.head_bottom * w,
            ..b
        };
        let belly = Bounds {
            left: b.left + self.belly_left * w,
            right: b.right - self.belly_right * w,
            top: b.top + self.belly_top * h,
            bottom: b.bottom - self.belly_bottom * h,
        };
        let beak_right = b.right + self.beak_reach * w;
        let beak_top = b.top + self.beak_top * h;
        let beak = Bounds {
            left: beak_right - self.beak_reach * w,
            right: beak_right,
            top: beak_top,
            bottom: beak_top + self.beak_height * h,
        };
        [head, belly, beak]
    }

    /// Obstacle box trimmed on both sides by fractions of its width.
    pub fn obstacle(&self, b: Bounds, width: f32) -> Bounds {
        Bounds {
            left: b.left + self.obstacle_left * width,
            right: b.right - self.obstacle_right * width,
            ..b
        }
    }

    /// True if any character region strictly overlaps the trimmed obstacle.
    pub fn hits(&self, character: Bounds, cw: f32, ch: f32, obstacle: Bounds, ow: f32) -> bool {
        let target = self.obstacle(obstacle, ow);
        self.character(character, cw, ch)
            .iter()
            .any(|region| region.overlaps(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn bird() -> Bounds {
        Bounds {
            top: 0.0,
            bottom: 120.0,
            left: 0.0,
            right: 100.0,
        }
    }

    #[test]
    fn test_character_regions() {
        let [head, belly, beak] = HitboxInsets::default().character(bird(), 100.0, 120.0);
        assert!(approx_eq(head.left, 50.0));
        assert!(approx_eq(head.right, 90.0));
        assert!(approx_eq(head.top, 0.0));
        assert!(approx_eq(head.bottom, 95.0));

        assert!(approx_eq(belly.left, 5.0));
        assert!(approx_eq(belly.right, 85.0));
        assert!(approx_eq(belly.top, 60.0));
        assert!(approx_eq(belly.bottom, 114.0));

        assert!(approx_eq(beak.left, 100.0));
        assert!(approx_eq(beak.right, 130.0));
        assert!(approx_eq(beak.top, 36.0));
        assert!(approx_eq(beak.bottom, 66.0));
    }

    #[test]
    fn test_obstacle_trim() {
        let pipe = Bounds { top: 0.0, bottom: 1102.0, left: 0.0, right: 280.0 };
        let t = HitboxInsets::default().obstacle(pipe, 280.0);
        assert!(approx_eq(t.left, 42.0));
        assert!(approx_eq(t.right, 252.0));
        assert!(approx_eq(t.top, 0.0));
    }

    #[test]
    fn test_bounding_overlap_in_corner_is_forgiven() {
        let insets = HitboxInsets::default();
        // raw boxes overlap at the character's top-left corner only
        let pipe = Bounds { top: -500.0, bottom: 30.0, left: -250.0, right: 30.0 };
        assert!(bird().overlaps(&pipe));
        assert!(!insets.hits(bird(), 100.0, 120.0, pipe, 280.0));
    }

    #[test]
    fn test_beak_reaches_past_bounds() {
        let insets = HitboxInsets::default();
        let pipe = Bounds { top: 0.0, bottom: 1102.0, left: 80.0, right: 360.0 };
        // trimmed left edge is 122, inside the beak region (100..130)
        assert!(insets.hits(bird(), 100.0, 120.0, pipe, 280.0));
    }

    #[test]
    fn test_just_past_beak_is_clear() {
        let insets = HitboxInsets::default();
        // raw boxes overlap by 11px but the trimmed edge sits past the beak
        let pipe = Bounds { top: 0.0, bottom: 1102.0, left: 89.0, right: 369.0 };
        assert!(bird().overlaps(&pipe));
        assert!(approx_eq(insets.obstacle(pipe, 280.0).left, 131.0));
        assert!(!insets.hits(bird(), 100.0, 120.0, pipe, 280.0));
    }
}
