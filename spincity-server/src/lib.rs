use std::net::{Ipv6Addr, SocketAddr};

use axum::routing::get;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod catalog;
mod collections;
mod context;
mod docs;
mod errors;
mod listings;
mod schemas;
mod sellers;
mod serialized;
mod storefront;

pub use context::*;
pub use errors::*;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 9050;

pub type Router = axum::Router<ServerContext>;

/// Builds the full router, with the API nested under /v1
pub fn router(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let version_one_router = Router::new()
        .merge(collections::router())
        .merge(listings::router())
        .merge(catalog::router())
        .merge(sellers::router())
        .merge(storefront::router());

    Router::new()
        .nest("/v1", version_one_router)
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Starts the spincity server
pub async fn run_server(context: ServerContext, port: u16) -> std::io::Result<()> {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();
    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on port {}", port);

    axum::serve(listener, router(context)).await
}
