mod config;
mod context;
mod docs;
mod errors;
mod gateway;
mod pages;
mod rooms;
mod schemas;
mod serialized;

use std::{
    io,
    net::{Ipv6Addr, SocketAddr},
    sync::Arc,
};

use axum::routing::get;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use watchparty_collab::Collab;

pub use config::*;
pub use context::ServerContext;
pub use gateway::Gateway;

pub type Router = axum::Router<ServerContext>;

/// Builds the routes of the server
pub fn router(context: ServerContext, config: &ServerConfig) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let version_one_router = Router::new()
        .merge(rooms::router())
        .merge(gateway::router());

    Router::new()
        .nest("/v1", version_one_router)
        .route("/api.json", get(docs::docs))
        .merge(pages::router(&config.static_dir))
        .layer(cors)
        .with_state(context)
}

/// Starts the watchparty server
pub async fn run_server(collab: Arc<Collab>, config: ServerConfig) -> io::Result<()> {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, config.port).into();

    let context = ServerContext::new(collab);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://localhost:{}", config.port);
    info!("Serving pages from {}", config.static_dir.display());

    axum::serve(listener, router(context, &config)).await
}
