use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use munim_infra::{NewProject, RecordProjectPayment};
use munim_projects::{ProjectId, ProjectPaymentId};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{TenantContext, UserContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_project))
        .route("/:id", get(get_project))
        .route("/:id/payments", get(list_payments).post(record_payment))
        .route("/:id/payments/:payment_id", delete(delete_payment))
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<NewProject>,
) -> axum::response::Response {
    match services.projects.create_project(tenant.tenant_id(), body) {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<ProjectId>,
) -> axum::response::Response {
    match services.projects.get_project(tenant.tenant_id(), &id) {
        Ok(project) => Json(project).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_payments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<ProjectId>,
) -> axum::response::Response {
    match services.projects.list_payments(tenant.tenant_id(), &id) {
        Ok(payments) => Json(serde_json::json!({ "items": payments })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<ProjectId>,
    Json(body): Json<RecordProjectPayment>,
) -> axum::response::Response {
    match services
        .projects
        .record_payment(tenant.tenant_id(), user.user_id(), &id, body)
    {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((_, payment_id)): Path<(ProjectId, ProjectPaymentId)>,
) -> axum::response::Response {
    match services.projects.delete_payment(tenant.tenant_id(), &payment_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
