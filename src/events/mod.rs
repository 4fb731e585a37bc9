//! Dispatch and notification.
//!
//! Submodules:
//! - [`framebus`] – prioritized per-frame phases with pause and resume
//! - [`gamenotice`] – state-change notices from the game to the HUD
pub mod framebus;
pub mod gamenotice;
