//! All schemas that are exposed from endpoints are defined here
//! along with their conversions

use serde::Serialize;
use utoipa::ToSchema;
use watchparty_collab::Room as CollabRoom;

/// A room that was just created
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoom {
    room_id: String,
    video_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    room_id: String,
    video_url: String,
    member_count: usize,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl ToSerialized<CreatedRoom> for CollabRoom {
    fn to_serialized(&self) -> CreatedRoom {
        CreatedRoom {
            room_id: self.id().to_string(),
            video_url: self.video_url().to_string(),
        }
    }
}

impl ToSerialized<Room> for CollabRoom {
    fn to_serialized(&self) -> Room {
        Room {
            room_id: self.id().to_string(),
            video_url: self.video_url().to_string(),
            member_count: self.members().len(),
        }
    }
}
