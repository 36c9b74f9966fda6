use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use munim_billing::BillId;
use munim_infra::{BillUpdate, PayBill, UploadBill, VendorPayment};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{TenantContext, UserContext};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_bills).post(upload_bill))
        .route("/:id", get(get_bill).put(update_bill).delete(delete_bill))
        .route("/:id/pay", post(pay_bill))
}

/// `POST /vendor-payments` lives outside the `/bills` nest but is handled
/// here: it is a billing operation.
pub fn vendor_payments_router() -> Router {
    Router::new().route("/", post(create_vendor_payment))
}

pub async fn upload_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::UploadBillRequest>,
) -> axum::response::Response {
    let request = UploadBill {
        vendor_id: body.vendor_id,
        bill_no: body.bill_no,
        bill_date: body.bill_date,
        amount: body.amount,
        project_id: body.project_id,
        file: None,
    };
    match services.billing.upload_bill(tenant.tenant_id(), request) {
        Ok(bill) => (StatusCode::CREATED, Json(bill)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_bills(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListBillsQuery>,
) -> axum::response::Response {
    match services.billing.list_bills(tenant.tenant_id(), query.vendor_id) {
        Ok(bills) => Json(serde_json::json!({ "items": bills })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BillId>,
) -> axum::response::Response {
    match services.billing.get_bill(tenant.tenant_id(), &id) {
        Ok(bill) => Json(bill).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BillId>,
    Json(body): Json<BillUpdate>,
) -> axum::response::Response {
    match services.billing.update_bill(tenant.tenant_id(), &id, body) {
        Ok(bill) => Json(bill).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BillId>,
) -> axum::response::Response {
    match services.billing.delete_bill(tenant.tenant_id(), &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn pay_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<BillId>,
    Json(body): Json<PayBill>,
) -> axum::response::Response {
    match services
        .billing
        .pay_bill(tenant.tenant_id(), user.user_id(), &id, body)
    {
        Ok(bill) => Json(bill).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_vendor_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<VendorPayment>,
) -> axum::response::Response {
    match services
        .billing
        .create_vendor_payment(tenant.tenant_id(), user.user_id(), body)
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "advance_id": outcome.advance.as_ref().map(|a| a.id),
                "bills_paid": outcome.bills_paid,
                "leftover": outcome.leftover,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
