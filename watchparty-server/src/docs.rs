use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::{
    rooms,
    schemas::NewRoomSchema,
    serialized::{CreatedRoom, Room},
};

#[derive(OpenApi)]
#[openapi(
    paths(rooms::create_room, rooms::create_room_from_query, rooms::room),
    components(schemas(NewRoomSchema, CreatedRoom, Room)),
    tags((name = "rooms", description = "Watch party rooms")),
    info(
        description = "watchparty-server exposes endpoints to create and look up watch party rooms"
    )
)]
pub struct ApiDoc;

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
