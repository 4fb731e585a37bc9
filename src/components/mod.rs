//! ECS components.
//!
//! Every drawable entity carries the base set spawned by
//! [`crate::systems::entity::spawn_entity`]: [`mapposition::MapPosition`],
//! [`extent::Extent`], [`rotation::Rotation`], [`scale::Scale`],
//! [`opacity::Opacity`], [`zindex::ZIndex`], [`debugoverlay::DebugOverlay`],
//! [`hooks::EntityHooks`] and [`listeners::BusListeners`]. Kind components
//! (bird, cloud, pipe, ...) sit on top.

pub mod animation;
pub mod bird;
pub mod cloud;
pub mod debugoverlay;
pub mod extent;
pub mod feather;
pub mod ghostbird;
pub mod hooks;
pub mod listeners;
pub mod mapposition;
pub mod opacity;
pub mod parts;
pub mod pipe;
pub mod poof;
pub mod rotation;
pub mod scale;
pub mod shockedbird;
pub mod sprite;
pub mod tween;
pub mod zindex;
