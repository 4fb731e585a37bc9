//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance `WorldTime` by `dt_ms` unscaled milliseconds.
pub fn update_world_time(world: &mut World, dt_ms: f64) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled = dt_ms.max(0.0) * wt.time_scale;
    wt.elapsed_ms += scaled;
    wt.delta_ms = scaled;
    wt.frame_count += 1;
}
