//! Axum router wiring.
//!
//! API and ops routes are matched first; every other path serves the client
//! bundle's `index.html` so client-side routing works (SPA fallback).

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::{api::handlers, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let router = Router::new()
        .route("/api/data/:year/:month", get(handlers::month_handler))
        .route("/api/increment", post(handlers::increment_handler))
        .route("/api/reset", post(handlers::reset_handler))
        .route("/api/catalog", get(handlers::catalog_handler))
        .route("/api/summary/:year/:month", get(handlers::summary_handler))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics));

    let router = match &state.cfg().server.static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            tracing::info!(dir = %dir.display(), "serving client bundle");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(handlers::not_found),
    };

    router.layer(cors).with_state(state)
}
