use bevy_ecs::prelude::Component;

use crate::events::framebus::ListenerId;

/// Frame bus registrations owned by a live entity.
///
/// Removed first thing during destruction; an entity without it is dying.
#[derive(Component, Clone, Copy, Debug)]
pub struct BusListeners {
    pub update: ListenerId,
    pub render: ListenerId,
}
