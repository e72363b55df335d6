pub mod handlers;
pub mod paths;

// std
use std::sync::Arc;
// crates
use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing, Router, Server};
use da_core::Store;
use hyper::header::{CONTENT_TYPE, USER_AGENT};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
// internal
use crate::config::HttpSettings;
use handlers::{get_blob, health, put_blob};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Parent of every request's cancellation token.
    pub shutdown: CancellationToken,
}

fn cors_layer(settings: &HttpSettings) -> CorsLayer {
    let mut builder = CorsLayer::new();
    if settings.cors_origins.is_empty() {
        builder = builder.allow_origin(Any);
    }

    for origin in &settings.cors_origins {
        match origin.as_str().parse::<HeaderValue>() {
            Ok(origin) => builder = builder.allow_origin(origin),
            Err(e) => warn!(%origin, "Ignoring invalid cors origin: {e}"),
        }
    }

    builder
        .allow_headers([CONTENT_TYPE, USER_AGENT])
        .allow_methods(Any)
}

pub fn router(settings: &HttpSettings, state: AppState) -> Router {
    let max_blob_size = state.store.max_blob_size();
    Router::new()
        .route(paths::PUT_BLOB, routing::post(put_blob))
        .route(paths::GET_BLOB, routing::get(get_blob))
        .route(paths::HEALTH, routing::get(health))
        .layer(DefaultBodyLimit::max(max_blob_size))
        .layer(cors_layer(settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until `shutdown` fires, cancelling in-flight store calls at that point.
pub async fn serve(
    settings: &HttpSettings,
    store: Arc<dyn Store>,
    shutdown: CancellationToken,
) -> Result<(), hyper::Error> {
    let app = router(
        settings,
        AppState {
            store,
            shutdown: shutdown.clone(),
        },
    );
    info!(address = %settings.address, "Serving proxy api");

    Server::bind(&settings.address)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
