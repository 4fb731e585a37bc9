//! Long-lived state: ECS resources in the stage's world, plus the stage's
//! own services (surface, textures, tweens, timers).
//!
//! Overview
//! - `debugmode` – global debug overlay switches
//! - `drawlist` – recording [`surface::Surface`] replayed by hosts
//! - `gameconfig` – INI-backed configuration and gameplay tuning
//! - `gamestate` – the game session: phase, score, live obstacles
//! - `input` – input normalisation and primary-action throttle
//! - `presentation` – text sinks for score and status
//! - `scorestore` – persistent best score and kill count
//! - `screensize` – play-field dimensions in pixels
//! - `surface` – the drawing capability
//! - `texturestore` – image load status keyed by sprite key
//! - `timerqueue` – one-shot real-time timers
//! - `tweenengine` – active tweens per entity and property
//! - `worldtime` – real-time clock
pub mod debugmode;
pub mod drawlist;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod presentation;
pub mod scorestore;
pub mod screensize;
pub mod surface;
pub mod texturestore;
pub mod timerqueue;
pub mod tweenengine;
pub mod worldtime;
