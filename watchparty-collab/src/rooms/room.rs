use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::ConnectionId;

/// The short identifier of a room, as shared in invite links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

/// A connection's participation in a room
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub connection_id: ConnectionId,
    /// Supplied by the client when joining, neither unique nor validated
    pub display_name: String,
}

/// A watch party, associating a video with the connections watching it.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    video_url: String,
    /// Members in the order they joined
    members: Vec<Member>,
}

impl Room {
    pub(super) fn new(id: RoomId, video_url: String) -> Self {
        Self {
            id,
            video_url,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the member owned by the given connection, if any
    pub fn member(&self, connection_id: ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
    }

    /// Every member's connection, in join order
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id).collect()
    }

    /// Every member's connection except the given one, in join order
    pub fn connection_ids_except(&self, connection_id: ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .map(|m| m.connection_id)
            .filter(|id| *id != connection_id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(super) fn member_mut(&mut self, connection_id: ConnectionId) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.connection_id == connection_id)
    }

    pub(super) fn push_member(&mut self, member: Member) {
        self.members.push(member)
    }

    pub(super) fn remove_member(&mut self, connection_id: ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)?;

        Some(self.members.remove(index))
    }
}

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
