use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

use crate::Router;

/// Serves the pages of the web client. Every room shares the same page.
pub fn router(static_dir: &Path) -> Router {
    Router::new()
        .route_service(
            "/room/:room_id",
            ServeFile::new(static_dir.join("room.html")),
        )
        .fallback_service(ServeDir::new(static_dir))
}
