use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use watchparty_collab::{Collab, RoomId};

use crate::{
    errors::{ServerError, ServerResult},
    schemas::{CreateRoomQuery, NewRoomSchema, ValidatedJson},
    serialized::{CreatedRoom, Room, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/v1/rooms",
    tag = "rooms",
    request_body = NewRoomSchema,
    responses(
        (status = 201, body = CreatedRoom),
        (status = 400, description = "The video URL is missing or empty")
    )
)]
async fn create_room(
    State(collab): State<Arc<Collab>>,
    ValidatedJson(body): ValidatedJson<NewRoomSchema>,
) -> ServerResult<(StatusCode, Json<CreatedRoom>)> {
    let room = collab.sessions.create_room(&body.video_url)?;

    Ok((StatusCode::CREATED, Json(room.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/v1/create",
    tag = "rooms",
    params(CreateRoomQuery),
    responses(
        (status = 200, body = CreatedRoom),
        (status = 400, description = "The video URL is missing or empty")
    )
)]
async fn create_room_from_query(
    State(collab): State<Arc<Collab>>,
    Query(query): Query<CreateRoomQuery>,
) -> ServerResult<Json<CreatedRoom>> {
    let video_url = query
        .video
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::InvalidInput("Video URL is required".to_string()))?;

    let room = collab.sessions.create_room(&video_url)?;

    Ok(Json(room.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/v1/rooms/{room_id}",
    tag = "rooms",
    params(
        ("room_id" = String, Path, description = "The id of the room")
    ),
    responses(
        (status = 200, body = Room),
        (status = 404, description = "The room does not exist")
    )
)]
async fn room(
    State(collab): State<Arc<Collab>>,
    Path(room_id): Path<String>,
) -> ServerResult<Json<Room>> {
    let room = collab.sessions.room(&RoomId::from(room_id))?;

    Ok(Json(room.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/:room_id", get(room))
        .route("/create", get(create_room_from_query))
}
