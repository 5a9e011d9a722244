use serde_json::Value;

use crate::{ConnectionId, RoomId};

/// Events a connection can send to the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The connection wants to become a member of a room
    Join {
        room_id: RoomId,
        display_name: String,
    },
    /// A chat message for everyone in the sender's room
    Chat {
        display_name: String,
        message: String,
    },
    /// The sender's player did something, like pausing or seeking.
    PlaybackControl {
        /// Forwarded as is, the coordinator does not interpret it
        action: Value,
    },
    /// The connection is gone. Always the last event of a connection.
    Disconnect,
}

/// Notifications produced by the coordinator, to be sent out by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Something the connection sent was rejected
    Error { message: String },
    /// Someone became a member of the room
    UserJoined { display_name: String },
    /// Someone left the room
    UserLeft { display_name: String },
    /// A chat message, including the sender's own
    ChatMessage {
        display_name: String,
        message: String,
    },
    /// Another member's player did something
    PlaybackControl { action: Value },
}

/// A notification addressed to a set of connections
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub recipients: Vec<ConnectionId>,
    pub notification: Notification,
}

impl Delivery {
    pub fn new(recipients: Vec<ConnectionId>, notification: Notification) -> Self {
        Self {
            recipients,
            notification,
        }
    }

    /// A delivery to a single connection
    pub fn to_one(recipient: ConnectionId, notification: Notification) -> Self {
        Self::new(vec![recipient], notification)
    }
}
