use axum::Router;

pub mod accounts;
pub mod bills;
pub mod entries;
pub mod loans;
pub mod projects;
pub mod system;
pub mod vendors;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/entries", entries::router())
        .nest("/bills", bills::router())
        .nest("/vendors", vendors::router())
        .nest("/advances", vendors::advances_router())
        .nest("/vendor-payments", bills::vendor_payments_router())
        .nest("/projects", projects::router())
        .nest("/loans", loans::router())
}
