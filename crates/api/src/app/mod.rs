//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (store, file storage, notifier)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs that differ from the service-layer types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router with default in-memory wiring (public
/// entrypoint used by `main.rs` and the black-box tests).
pub fn build_app() -> Router {
    build_app_with(Arc::new(services::build_services()))
}

/// Build the router over pre-wired services (tests inject doubles here).
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    // Protected routes: require tenant context.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::tenant_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
