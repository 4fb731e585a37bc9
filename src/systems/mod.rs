//! Per-frame logic.
//!
//! Everything here is a plain function over [`crate::stage::Stage`] and an
//! entity, registered as a frame bus listener when the entity spawns.
//!
//! Submodules overview
//! - [`entity`] – spawn, base update, destroy and geometry helpers
//! - [`render`] – the base draw protocol shared by every entity
//! - [`animation`] – sprite-sheet frame playback
//! - [`easing`] – easing curves and exponential smoothing
//! - [`tween`] – starting and advancing property tweens
//! - [`time`] – advance the real-time clock
//! - [`collision`] – forgiving multi-rect hit test
//! - [`bird`], [`shockedbird`], [`ghostbird`], [`feather`], [`poof`],
//!   [`cloud`], [`pipe`] – the game's entity kinds
//! - [`hud`] – forward game notices to a presentation sink

pub mod animation;
pub mod bird;
pub mod cloud;
pub mod collision;
pub mod easing;
pub mod entity;
pub mod feather;
pub mod ghostbird;
pub mod hud;
pub mod pipe;
pub mod poof;
pub mod render;
pub mod shockedbird;
pub mod time;
pub mod tween;
