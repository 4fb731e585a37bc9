//! zapbird library.
//!
//! A small 2D arcade runtime (frame bus, entities, tweens, sprite
//! animation) and the flappy-style game built on it. Exposed as a library
//! for the binary, the integration tests and alternative hosts.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod host;
pub mod resources;
pub mod stage;
pub mod systems;
