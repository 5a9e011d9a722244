mod room;

use std::collections::HashMap;

use log::info;
use thiserror::Error;

pub use room::*;

use crate::{util::random_string, Config, ConnectionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// A required field was missing or empty
    #[error("{field} is required")]
    InvalidInput { field: &'static str },
    #[error("Room {0} not found")]
    NotFound(RoomId),
}

/// Describes a membership that was removed from the registry
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub room_id: RoomId,
    pub member: Member,
    /// The room had no members left and was deleted
    pub room_removed: bool,
}

/// The authoritative store of all live rooms.
///
/// A room lives from its creation until the last of its members is removed.
/// The registry performs no I/O and sends nothing, broadcasting is left to the caller.
#[derive(Debug)]
pub struct RoomRegistry {
    room_id_length: usize,
    rooms: HashMap<RoomId, Room>,
    /// The room each joined connection belongs to
    memberships: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            room_id_length: config.room_id_length.max(1),
            rooms: Default::default(),
            memberships: Default::default(),
        }
    }

    /// Creates an empty room for the given video and returns its id
    pub fn create_room(&mut self, video_url: &str) -> Result<RoomId, RoomError> {
        if video_url.is_empty() {
            return Err(RoomError::InvalidInput { field: "videoUrl" });
        }

        let id = self.unused_id();
        let room = Room::new(id.clone(), video_url.to_string());

        self.rooms.insert(id.clone(), room);
        info!("Room {} created with video {}", id, video_url);

        Ok(id)
    }

    pub fn room(&self, room_id: &RoomId) -> Result<&Room, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Adds a connection as a member of a room.
    ///
    /// A connection is a member of at most one room. Joining the room it is already in
    /// only updates its display name, joining another room leaves the previous one first.
    pub fn add_member(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: String,
    ) -> Result<(), RoomError> {
        // Validate first, a rejected join must leave everything as it was
        if !self.rooms.contains_key(room_id) {
            return Err(RoomError::NotFound(room_id.clone()));
        }

        let current = self.memberships.get(&connection_id).cloned();

        match current {
            Some(current) if &current == room_id => {
                if let Some(member) = self
                    .rooms
                    .get_mut(room_id)
                    .and_then(|r| r.member_mut(connection_id))
                {
                    member.display_name = display_name;
                }

                return Ok(());
            }
            Some(_) => {
                self.remove_member(connection_id);
            }
            None => {}
        }

        // Leaving a different room can never delete this one
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        room.push_member(Member {
            connection_id,
            display_name,
        });
        self.memberships.insert(connection_id, room_id.clone());

        Ok(())
    }

    /// Removes the connection from whichever room it is in, deleting the room if it became empty.
    /// Returns [None] if the connection was not a member of any room.
    pub fn remove_member(&mut self, connection_id: ConnectionId) -> Option<Departure> {
        let room_id = self.memberships.remove(&connection_id)?;
        let room = self.rooms.get_mut(&room_id)?;
        let member = room.remove_member(connection_id)?;

        let room_removed = room.is_empty();

        if room_removed {
            self.rooms.remove(&room_id);
            info!("Deleting empty room {}", room_id);
        }

        Some(Departure {
            room_id,
            member,
            room_removed,
        })
    }

    /// Returns the id of the room the connection is a member of
    pub fn room_of(&self, connection_id: ConnectionId) -> Option<&RoomId> {
        self.memberships.get(&connection_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// The amount of live rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn unused_id(&self) -> RoomId {
        loop {
            let candidate = RoomId::from(random_string(self.room_id_length));

            if !self.rooms.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
