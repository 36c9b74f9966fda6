use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use munim_core::EntryId;
use munim_ledger::{EntryFilter, NewEntry};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{TenantContext, UserContext};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", get(get_entry).delete(delete_entry))
}

pub async fn create_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<NewEntry>,
) -> axum::response::Response {
    match services
        .ledger
        .record_entry(tenant.tenant_id(), user.user_id(), body)
    {
        Ok(line) => (StatusCode::CREATED, Json(line)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(filter): Query<EntryFilter>,
) -> axum::response::Response {
    match services.ledger.list_entries(tenant.tenant_id(), &filter) {
        Ok(lines) => Json(serde_json::json!({ "items": lines })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<EntryId>,
) -> axum::response::Response {
    match services.ledger.get_entry(tenant.tenant_id(), &id) {
        Ok(line) => Json(line).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<EntryId>,
) -> axum::response::Response {
    match services.ledger.delete_entry(tenant.tenant_id(), &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
