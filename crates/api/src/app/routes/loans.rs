use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use munim_loans::{LoanId, NewLoan};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_loans).post(create_loan))
        .route("/:id", get(get_loan))
        .route("/:id/approve", post(approve_loan))
        .route("/:id/disburse", post(disburse_loan))
        .route("/:id/payments", post(record_payment))
}

pub async fn create_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<NewLoan>,
) -> axum::response::Response {
    match services.loans.create_loan(tenant.tenant_id(), body) {
        Ok(loan) => (StatusCode::CREATED, Json(loan)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_loans(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.loans.list_loans(tenant.tenant_id()) {
        Ok(loans) => Json(serde_json::json!({ "items": loans })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<LoanId>,
) -> axum::response::Response {
    match services.loans.get_loan(tenant.tenant_id(), &id) {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn approve_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<LoanId>,
) -> axum::response::Response {
    match services.loans.approve(tenant.tenant_id(), &id) {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn disburse_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<LoanId>,
) -> axum::response::Response {
    match services.loans.disburse(tenant.tenant_id(), &id) {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<LoanId>,
    Json(body): Json<dto::LoanPaymentRequest>,
) -> axum::response::Response {
    match services
        .loans
        .record_payment(tenant.tenant_id(), &id, body.amount)
    {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
