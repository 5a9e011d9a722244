use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use watchparty_collab::{Collab, ConnectionId, Notification, RoomId, SessionEvent, Transport};

use crate::Router;

type ConnectionSender = UnboundedSender<Message>;

/// Messages sent by clients over the gateway
#[derive(Debug, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinRoom {
        #[serde(default)]
        room_id: String,
        #[serde(default)]
        name: String,
    },
    /// The room is decided by the sender's membership, any `roomId` is ignored.
    ChatMessage {
        #[serde(default)]
        name: String,
        #[serde(default)]
        message: String,
    },
    VideoControl {
        #[serde(default)]
        action: Value,
    },
}

/// Messages sent to clients over the gateway
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Something the client sent was rejected
    Error { message: String },
    /// Someone else joined the room
    UserJoined { name: String, message: String },
    /// Someone else left the room
    UserLeft { name: String, message: String },
    ChatMessage { name: String, message: String },
    VideoControl { action: Value },
}

impl From<ClientMessage> for SessionEvent {
    fn from(value: ClientMessage) -> Self {
        match value {
            ClientMessage::JoinRoom { room_id, name } => Self::Join {
                room_id: RoomId::from(room_id),
                display_name: name,
            },
            ClientMessage::ChatMessage { name, message } => Self::Chat {
                display_name: name,
                message,
            },
            ClientMessage::VideoControl { action } => Self::PlaybackControl { action },
        }
    }
}

impl From<&Notification> for ServerMessage {
    fn from(value: &Notification) -> Self {
        match value {
            Notification::Error { message } => Self::Error {
                message: message.clone(),
            },
            Notification::UserJoined { display_name } => Self::UserJoined {
                name: display_name.clone(),
                message: format!("{} joined the room", display_name),
            },
            Notification::UserLeft { display_name } => Self::UserLeft {
                name: display_name.clone(),
                message: format!("{} left the room", display_name),
            },
            Notification::ChatMessage {
                display_name,
                message,
            } => Self::ChatMessage {
                name: display_name.clone(),
                message: message.clone(),
            },
            Notification::PlaybackControl { action } => Self::VideoControl {
                action: action.clone(),
            },
        }
    }
}

/// Manages websocket connections, and relays their events to the session coordinator
pub struct Gateway {
    collab: Arc<Collab>,
    connections: DashMap<ConnectionId, ConnectionSender>,
}

impl Gateway {
    pub fn new(collab: Arc<Collab>) -> Self {
        Self {
            collab,
            connections: Default::default(),
        }
    }

    /// The amount of open connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    async fn serve(self: Arc<Self>, socket: WebSocket) {
        let (mut outgoing, mut incoming) = socket.split();
        let (connection_id, mut pending) = self.connect();

        // Ends once the connection is unregistered and its sender dropped
        tokio::spawn(async move {
            while let Some(message) = pending.recv().await {
                if outgoing.send(message).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(message)) = incoming.next().await {
            match message {
                Message::Text(text) => self.receive(connection_id, &text),
                Message::Close(_) => break,
                _ => {}
            }
        }

        self.disconnect(connection_id);
    }

    fn connect(&self) -> (ConnectionId, UnboundedReceiver<Message>) {
        let connection_id = ConnectionId::new();
        let (sender, receiver) = mpsc::unbounded_channel();

        self.connections.insert(connection_id, sender);
        info!("Connection {} opened", connection_id);

        (connection_id, receiver)
    }

    fn receive(&self, connection_id: ConnectionId, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self
                .collab
                .sessions
                .handle(connection_id, message.into(), self),
            Err(error) => warn!(
                "Ignoring malformed message from connection {}: {}",
                connection_id, error
            ),
        }
    }

    fn disconnect(&self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
        self.collab
            .sessions
            .handle(connection_id, SessionEvent::Disconnect, self);

        info!("Connection {} closed", connection_id);
    }
}

impl Transport for Gateway {
    fn deliver(&self, recipient: ConnectionId, notification: &Notification) {
        let Some(sender) = self.connections.get(&recipient) else {
            return;
        };

        match serde_json::to_string(&ServerMessage::from(notification)) {
            // The receiving end is only gone while the connection is closing
            Ok(text) => {
                let _ = sender.send(Message::Text(text));
            }
            Err(error) => warn!("Could not serialize notification: {}", error),
        }
    }
}

async fn gateway(ws: WebSocketUpgrade, State(gateway): State<Arc<Gateway>>) -> Response {
    ws.on_upgrade(move |socket| gateway.serve(socket))
}

pub fn router() -> Router {
    Router::new().route("/gateway", get(gateway))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use watchparty_collab::{Notification, RoomId, SessionEvent};

    use super::{ClientMessage, ServerMessage};

    fn parse(value: Value) -> SessionEvent {
        serde_json::from_value::<ClientMessage>(value)
            .expect("message parses")
            .into()
    }

    fn serialize(notification: Notification) -> Value {
        serde_json::to_value(ServerMessage::from(&notification)).expect("message serializes")
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            parse(json!({ "type": "join-room", "roomId": "abc123", "name": "Alice" })),
            SessionEvent::Join {
                room_id: RoomId::from("abc123"),
                display_name: "Alice".into()
            },
            "join is parsed"
        );
        assert_eq!(
            parse(json!({ "type": "chat-message", "roomId": "abc123", "name": "Alice", "message": "hi" })),
            SessionEvent::Chat {
                display_name: "Alice".into(),
                message: "hi".into()
            },
            "room id in chat is ignored"
        );
        assert_eq!(
            parse(json!({ "type": "video-control", "roomId": "abc123" })),
            SessionEvent::PlaybackControl {
                action: Value::Null
            },
            "missing action becomes null"
        );
        assert!(
            serde_json::from_value::<ClientMessage>(json!({ "type": "dance" })).is_err(),
            "unknown messages are rejected"
        );
    }

    #[test]
    fn test_server_messages() {
        assert_eq!(
            serialize(Notification::UserJoined {
                display_name: "Bob".into()
            }),
            json!({ "type": "user-joined", "name": "Bob", "message": "Bob joined the room" }),
            "join notice is readable"
        );
        assert_eq!(
            serialize(Notification::ChatMessage {
                display_name: "Alice".into(),
                message: "hi".into()
            }),
            json!({ "type": "chat-message", "name": "Alice", "message": "hi" }),
            "chat is forwarded unchanged"
        );
        assert_eq!(
            serialize(Notification::PlaybackControl {
                action: json!("pause")
            }),
            json!({ "type": "video-control", "action": "pause" }),
            "action is forwarded unchanged"
        );
        assert_eq!(
            serialize(Notification::Error {
                message: "Room nope not found".into()
            }),
            json!({ "type": "error", "message": "Room nope not found" }),
            "errors carry their message"
        );
    }
}
