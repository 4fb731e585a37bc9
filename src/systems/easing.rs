//! Easing curves.
//!
//! All curves use the classic `(t, b, c, d)` signature: elapsed time, start
//! value, total change and duration. `f(0) == b` and `f(d) == b + c` for
//! every built-in curve.

use std::f32::consts::PI;

use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};

/// `(time, begin, change, duration) -> value`
pub type EasingFn = fn(f32, f32, f32, f32) -> f32;

/// Curve selection for a tween.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Easing {
    Linear,
    #[default]
    InOutCubic,
    OutElastic,
    /// A curve registered at runtime under this name.
    Named(String),
}

pub fn linear(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if d <= 0.0 {
        return b + c;
    }
    c * t / d + b
}

pub fn ease_in_out_cubic(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if d <= 0.0 {
        return b + c;
    }
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    t -= 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

/// Overshooting spring settle with period `0.3 * d`.
pub fn ease_out_elastic(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    if d <= 0.0 {
        return b + c;
    }
    let p = d * 0.3;
    let a = c;
    // amplitude equals the change, so the phase shift is a quarter period
    let s = p / 4.0;
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    a * 2f32.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}

/// Name -> curve lookup, seeded with the built-ins.
#[derive(Debug, Clone)]
pub struct EasingRegistry {
    curves: FxHashMap<String, EasingFn>,
}

impl Default for EasingRegistry {
    fn default() -> Self {
        let mut curves: FxHashMap<String, EasingFn> = FxHashMap::default();
        curves.insert("linear".into(), linear);
        curves.insert("easeInOutCubic".into(), ease_in_out_cubic);
        curves.insert("easeOutElastic".into(), ease_out_elastic);
        Self { curves }
    }
}

impl EasingRegistry {
    pub fn register(&mut self, name: impl Into<String>, curve: EasingFn) {
        self.curves.insert(name.into(), curve);
    }

    pub fn resolve(&self, easing: &Easing) -> EngineResult<EasingFn> {
        match easing {
            Easing::Linear => Ok(linear),
            Easing::InOutCubic => Ok(ease_in_out_cubic),
            Easing::OutElastic => Ok(ease_out_elastic),
            Easing::Named(name) => self
                .curves
                .get(name)
                .copied()
                .ok_or_else(|| EngineError::UnknownEasing(name.clone())),
        }
    }
}

/// One step of exponential smoothing: move `current` a `1/divisor` share of
/// the way towards `target`.
pub fn approach(current: f32, target: f32, divisor: f32) -> f32 {
    current + (target - current) / divisor
}
