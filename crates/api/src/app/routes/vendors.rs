use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use munim_infra::NewVendor;
use munim_vendors::{AdvanceId, VendorId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_vendors).post(create_vendor))
        .route("/:id", get(get_vendor))
        .route("/:id/statement", get(vendor_statement))
        .route("/:id/advances", get(list_advances).post(record_advance))
}

/// `POST /advances/:id/clear` is rooted at the advance, not the vendor.
pub fn advances_router() -> Router {
    Router::new().route("/:id/clear", post(clear_advance))
}

pub async fn create_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<NewVendor>,
) -> axum::response::Response {
    match services.vendors.create_vendor(tenant.tenant_id(), body) {
        Ok(vendor) => (StatusCode::CREATED, Json(vendor)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_vendors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.vendors.list_vendors(tenant.tenant_id()) {
        Ok(vendors) => Json(serde_json::json!({ "items": vendors })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<VendorId>,
) -> axum::response::Response {
    match services.vendors.get_vendor(tenant.tenant_id(), &id) {
        Ok(vendor) => Json(vendor).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn vendor_statement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<VendorId>,
) -> axum::response::Response {
    match services.vendors.statement(tenant.tenant_id(), &id) {
        Ok(lines) => Json(serde_json::json!({ "items": lines })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn record_advance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<VendorId>,
    Json(body): Json<dto::RecordAdvanceRequest>,
) -> axum::response::Response {
    match services
        .vendors
        .record_advance(tenant.tenant_id(), &id, body.amount, body.date)
    {
        Ok(advance) => (StatusCode::CREATED, Json(advance)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_advances(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<VendorId>,
) -> axum::response::Response {
    match services.vendors.list_advances(tenant.tenant_id(), &id) {
        Ok(advances) => Json(serde_json::json!({ "items": advances })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn clear_advance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<AdvanceId>,
) -> axum::response::Response {
    match services.vendors.clear_advance(tenant.tenant_id(), &id) {
        Ok(advance) => Json(advance).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
