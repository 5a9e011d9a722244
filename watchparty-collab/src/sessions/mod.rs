mod dispatch;
mod events;

use log::info;
use parking_lot::Mutex;

pub use dispatch::*;
pub use events::*;

use crate::{Config, Id, Room, RoomError, RoomId, RoomRegistry};

/// Marker for ids of connections handed to the coordinator by a transport
pub enum Connection {}
pub type ConnectionId = Id<Connection>;

/// Sends notifications to connections, implemented by whatever carries them.
pub trait Transport {
    /// Delivers a notification to a single connection.
    /// Must not block, it is called while the registry is locked.
    fn deliver(&self, recipient: ConnectionId, notification: &Notification);
}

/// Translates connection events into registry changes and outbound notifications.
///
/// Owns the [RoomRegistry]. Events are handled one at a time, and each event's
/// notifications are handed to the transport before the next event is processed.
pub struct SessionCoordinator {
    config: Config,
    registry: Mutex<RoomRegistry>,
}

impl SessionCoordinator {
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, RoomRegistry::new(config))
    }

    pub fn with_registry(config: &Config, registry: RoomRegistry) -> Self {
        Self {
            config: config.clone(),
            registry: registry.into(),
        }
    }

    /// Creates a new room, returning a snapshot of it
    pub fn create_room(&self, video_url: &str) -> Result<Room, RoomError> {
        let mut registry = self.registry.lock();
        let id = registry.create_room(video_url)?;

        registry.room(&id).cloned()
    }

    /// Returns a snapshot of the room
    pub fn room(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        self.registry.lock().room(room_id).cloned()
    }

    /// Handles an event from a connection, sending the resulting notifications through the transport.
    pub fn handle<T>(&self, connection_id: ConnectionId, event: SessionEvent, transport: &T)
    where
        T: Transport + ?Sized,
    {
        let mut registry = self.registry.lock();
        let deliveries = dispatch(&self.config, &mut registry, connection_id, event);

        for delivery in deliveries {
            for recipient in delivery.recipients {
                transport.deliver(recipient, &delivery.notification)
            }
        }
    }

    /// The amount of live rooms
    pub fn room_count(&self) -> usize {
        self.registry.lock().len()
    }
}

impl Drop for SessionCoordinator {
    fn drop(&mut self) {
        let remaining = self.registry.get_mut().len();

        if remaining > 0 {
            info!("Discarding {} live room(s)", remaining);
        }
    }
}
