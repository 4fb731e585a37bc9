use bevy_ecs::prelude::Resource;

/// Real-time clock of the stage, in milliseconds.
///
/// Advanced by the host once per frame whether or not the frame bus is
/// paused, so timers keep running during a pause.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed_ms: f64,
    pub delta_ms: f64,
    pub time_scale: f64,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed_ms: 0.0,
            delta_ms: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}
