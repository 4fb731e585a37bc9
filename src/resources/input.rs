//! Player input resource.
//!
//! Hosts translate whatever their platform delivers into [`RawInput`] and
//! feed the resulting [`InputEvent`] to the game. The Escape key toggles
//! the pause; any other key, a mouse button or a touch is the primary
//! action. Primary actions are throttled so a key held down, or a mouse
//! and touch event pair, counts once.

use bevy_ecs::prelude::*;

/// Minimum time between two accepted primary actions.
pub const PRIMARY_DEBOUNCE_MS: f64 = 150.0;

/// Platform input before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput {
    KeyDown { escape: bool },
    PointerDown,
    TouchStart,
    /// The window lost focus.
    Blur,
}

/// What the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Start, resume, flap or restart, depending on the game phase.
    Primary,
    ToggleSuspend,
    FocusLost,
}

impl From<RawInput> for InputEvent {
    fn from(raw: RawInput) -> Self {
        match raw {
            RawInput::KeyDown { escape: true } => InputEvent::ToggleSuspend,
            RawInput::KeyDown { escape: false } | RawInput::PointerDown | RawInput::TouchStart => {
                InputEvent::Primary
            }
            RawInput::Blur => InputEvent::FocusLost,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub debounce_ms: f64,
    last_primary_ms: Option<f64>,
    /// Primary actions accepted since the last reset.
    pub accepted: u64,
    /// Primary actions swallowed by the throttle.
    pub dropped: u64,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            debounce_ms: PRIMARY_DEBOUNCE_MS,
            last_primary_ms: None,
            accepted: 0,
            dropped: 0,
        }
    }
}

impl InputState {
    /// Register a primary press at `now_ms`. False if it came too soon
    /// after the previous accepted one.
    pub fn press_primary(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_primary_ms {
            if now_ms - last < self.debounce_ms {
                self.dropped += 1;
                return false;
            }
        }
        self.last_primary_ms = Some(now_ms);
        self.accepted += 1;
        true
    }

    pub fn reset(&mut self) {
        *self = Self {
            debounce_ms: self.debounce_ms,
            ..Self::default()
        };
    }
}
