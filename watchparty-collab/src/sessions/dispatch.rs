use log::{debug, info, warn};
use serde_json::Value;

use crate::{Config, ConnectionId, Room, RoomId, RoomRegistry};

use super::{Delivery, Notification, SessionEvent};

/// Applies an event from a connection to the registry, and returns what should be sent out.
///
/// Every delivery is computed after the registry has been updated, so recipients
/// can rely on the change already being visible.
pub fn dispatch(
    config: &Config,
    registry: &mut RoomRegistry,
    connection_id: ConnectionId,
    event: SessionEvent,
) -> Vec<Delivery> {
    match event {
        SessionEvent::Join {
            room_id,
            display_name,
        } => join(registry, connection_id, room_id, display_name),
        SessionEvent::Chat {
            display_name,
            message,
        } => chat(registry, connection_id, display_name, message),
        SessionEvent::PlaybackControl { action } => {
            playback_control(registry, connection_id, action)
        }
        SessionEvent::Disconnect => disconnect(config, registry, connection_id),
    }
}

fn join(
    registry: &mut RoomRegistry,
    connection_id: ConnectionId,
    room_id: RoomId,
    display_name: String,
) -> Vec<Delivery> {
    if let Err(error) = registry.add_member(&room_id, connection_id, display_name.clone()) {
        warn!("{} could not join room {}: {}", display_name, room_id, error);

        return vec![Delivery::to_one(
            connection_id,
            Notification::Error {
                message: error.to_string(),
            },
        )];
    }

    info!("{} joined room {}", display_name, room_id);

    let others = registry
        .room(&room_id)
        .map(|r| r.connection_ids_except(connection_id))
        .unwrap_or_default();

    broadcast(others, Notification::UserJoined { display_name })
}

fn chat(
    registry: &RoomRegistry,
    connection_id: ConnectionId,
    display_name: String,
    message: String,
) -> Vec<Delivery> {
    let Some(room) = joined_room(registry, connection_id) else {
        debug!("Dropping chat message from unjoined connection {}", connection_id);
        return vec![];
    };

    debug!("Chat in room {}: {}: {}", room.id(), display_name, message);

    // The sender gets its own message back too
    broadcast(
        room.connection_ids(),
        Notification::ChatMessage {
            display_name,
            message,
        },
    )
}

fn playback_control(
    registry: &RoomRegistry,
    connection_id: ConnectionId,
    action: Value,
) -> Vec<Delivery> {
    let Some(room) = joined_room(registry, connection_id) else {
        debug!("Dropping playback control from unjoined connection {}", connection_id);
        return vec![];
    };

    debug!("Playback control in room {}: {}", room.id(), action);

    broadcast(
        room.connection_ids_except(connection_id),
        Notification::PlaybackControl { action },
    )
}

fn disconnect(
    config: &Config,
    registry: &mut RoomRegistry,
    connection_id: ConnectionId,
) -> Vec<Delivery> {
    let Some(departure) = registry.remove_member(connection_id) else {
        return vec![];
    };

    info!(
        "{} left room {}",
        departure.member.display_name, departure.room_id
    );

    if !config.announce_departures || departure.room_removed {
        return vec![];
    }

    let remaining = registry
        .room(&departure.room_id)
        .map(Room::connection_ids)
        .unwrap_or_default();

    broadcast(
        remaining,
        Notification::UserLeft {
            display_name: departure.member.display_name,
        },
    )
}

fn joined_room(registry: &RoomRegistry, connection_id: ConnectionId) -> Option<&Room> {
    registry
        .room_of(connection_id)
        .and_then(|id| registry.room(id).ok())
}

fn broadcast(recipients: Vec<ConnectionId>, notification: Notification) -> Vec<Delivery> {
    if recipients.is_empty() {
        return vec![];
    }

    vec![Delivery::new(recipients, notification)]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::dispatch;
    use crate::{
        Config, ConnectionId, Delivery, Notification, RoomId, RoomRegistry, SessionEvent,
    };

    struct Fixture {
        config: Config,
        registry: RoomRegistry,
        room_id: RoomId,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_config(Config::default())
        }

        fn with_config(config: Config) -> Self {
            let mut registry = RoomRegistry::new(&config);
            let room_id = registry.create_room("http://x/video.mp4").unwrap();

            Self {
                config,
                registry,
                room_id,
            }
        }

        fn send(&mut self, connection_id: ConnectionId, event: SessionEvent) -> Vec<Delivery> {
            dispatch(&self.config, &mut self.registry, connection_id, event)
        }

        fn join(&mut self, name: &str) -> ConnectionId {
            let connection_id = ConnectionId::new();
            let room_id = self.room_id.clone();

            self.send(
                connection_id,
                SessionEvent::Join {
                    room_id,
                    display_name: name.to_string(),
                },
            );

            connection_id
        }
    }

    #[test]
    fn test_join_unknown_room() {
        let mut fixture = Fixture::new();
        let alice = ConnectionId::new();

        let deliveries = fixture.send(
            alice,
            SessionEvent::Join {
                room_id: RoomId::from("nope"),
                display_name: "Alice".into(),
            },
        );

        assert_eq!(
            deliveries,
            vec![Delivery::to_one(
                alice,
                Notification::Error {
                    message: "Room nope not found".into()
                }
            )],
            "only the joiner is told"
        );
        assert_eq!(fixture.registry.room_of(alice), None, "alice is not a member");
        assert!(
            fixture.registry.room(&fixture.room_id).unwrap().is_empty(),
            "existing room is unaffected"
        );
    }

    #[test]
    fn test_join_notifies_others() {
        let mut fixture = Fixture::new();
        let room_id = fixture.room_id.clone();

        let alice = ConnectionId::new();
        let bob = ConnectionId::new();

        let first = fixture.send(
            alice,
            SessionEvent::Join {
                room_id: room_id.clone(),
                display_name: "Alice".into(),
            },
        );
        assert!(first.is_empty(), "nobody to notify in an empty room");

        let second = fixture.send(
            bob,
            SessionEvent::Join {
                room_id: room_id.clone(),
                display_name: "Bob".into(),
            },
        );

        assert_eq!(
            second,
            vec![Delivery::new(
                vec![alice],
                Notification::UserJoined {
                    display_name: "Bob".into()
                }
            )],
            "alice is told, bob is not"
        );

        let room = fixture.registry.room(&room_id).unwrap();
        let bob_entries = room
            .members()
            .iter()
            .filter(|m| m.connection_id == bob)
            .count();

        assert_eq!(bob_entries, 1, "bob is a member exactly once");
    }

    #[test]
    fn test_chat_reaches_everyone() {
        let mut fixture = Fixture::new();

        let alice = fixture.join("Alice");
        let bob = fixture.join("Bob");

        let deliveries = fixture.send(
            alice,
            SessionEvent::Chat {
                display_name: "Alice".into(),
                message: "hi".into(),
            },
        );

        assert_eq!(
            deliveries,
            vec![Delivery::new(
                vec![alice, bob],
                Notification::ChatMessage {
                    display_name: "Alice".into(),
                    message: "hi".into()
                }
            )],
            "sender is included and payload is unchanged"
        );
    }

    #[test]
    fn test_playback_control_skips_sender() {
        let mut fixture = Fixture::new();

        let alice = fixture.join("Alice");
        let bob = fixture.join("Bob");
        let carol = fixture.join("Carol");

        let action = json!({ "type": "seek", "time": 42.5 });
        let deliveries = fixture.send(
            bob,
            SessionEvent::PlaybackControl {
                action: action.clone(),
            },
        );

        assert_eq!(
            deliveries,
            vec![Delivery::new(
                vec![alice, carol],
                Notification::PlaybackControl { action }
            )],
            "everyone but bob is told"
        );
    }

    #[test]
    fn test_playback_control_alone() {
        let mut fixture = Fixture::new();
        let alice = fixture.join("Alice");

        let deliveries = fixture.send(
            alice,
            SessionEvent::PlaybackControl {
                action: json!("play"),
            },
        );

        assert!(deliveries.is_empty(), "nobody else to tell");
    }

    #[test]
    fn test_unjoined_events_are_dropped() {
        let mut fixture = Fixture::new();
        fixture.join("Alice");
        let stranger = ConnectionId::new();

        let chat = fixture.send(
            stranger,
            SessionEvent::Chat {
                display_name: "Mallory".into(),
                message: "hello?".into(),
            },
        );
        let control = fixture.send(
            stranger,
            SessionEvent::PlaybackControl {
                action: json!("pause"),
            },
        );

        assert!(chat.is_empty(), "chat from unjoined connection goes nowhere");
        assert!(control.is_empty(), "control from unjoined connection goes nowhere");
    }

    #[test]
    fn test_disconnect_is_silent_by_default() {
        let mut fixture = Fixture::new();
        let room_id = fixture.room_id.clone();

        let alice = fixture.join("Alice");
        let bob = fixture.join("Bob");

        let deliveries = fixture.send(bob, SessionEvent::Disconnect);
        let repeated = fixture.send(bob, SessionEvent::Disconnect);

        assert!(deliveries.is_empty(), "departures are not announced");
        assert!(repeated.is_empty(), "duplicate disconnect does nothing");
        assert_eq!(
            fixture.registry.room(&room_id).unwrap().connection_ids(),
            vec![alice],
            "alice remains"
        );

        fixture.send(alice, SessionEvent::Disconnect);
        assert!(!fixture.registry.contains(&room_id), "empty room is deleted");
    }

    #[test]
    fn test_disconnect_announced_when_enabled() {
        let mut fixture = Fixture::with_config(Config {
            announce_departures: true,
            ..Default::default()
        });

        let alice = fixture.join("Alice");
        let bob = fixture.join("Bob");

        let deliveries = fixture.send(bob, SessionEvent::Disconnect);

        assert_eq!(
            deliveries,
            vec![Delivery::new(
                vec![alice],
                Notification::UserLeft {
                    display_name: "Bob".into()
                }
            )],
            "alice is told bob left"
        );

        let last = fixture.send(alice, SessionEvent::Disconnect);
        assert!(last.is_empty(), "nobody is left to tell");
    }
}
