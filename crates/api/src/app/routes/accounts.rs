use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use munim_banking::{BankAccountId, NewBankAccount};
use munim_infra::AccountUpdate;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/stats", get(account_stats))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/:id/ledger", get(account_ledger))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<NewBankAccount>,
) -> axum::response::Response {
    match services.banking.create_account(tenant.tenant_id(), body) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListAccountsQuery>,
) -> axum::response::Response {
    match services.banking.list_accounts(tenant.tenant_id(), query.status) {
        Ok(accounts) => Json(serde_json::json!({ "items": accounts })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn account_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.banking.stats(tenant.tenant_id()) {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BankAccountId>,
) -> axum::response::Response {
    match services.banking.get_account(tenant.tenant_id(), &id) {
        Ok(account) => Json(account).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BankAccountId>,
    Json(body): Json<AccountUpdate>,
) -> axum::response::Response {
    match services.banking.update_account(tenant.tenant_id(), &id, body) {
        Ok(account) => Json(account).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Soft-deactivates by default; `?hard=true` removes the document (its
/// historical entries remain in the ledger).
pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BankAccountId>,
    Query(query): Query<dto::DeleteAccountQuery>,
) -> axum::response::Response {
    if query.hard {
        match services.banking.delete_account(tenant.tenant_id(), &id) {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(e) => errors::service_error_to_response(e),
        }
    } else {
        match services.banking.deactivate_account(tenant.tenant_id(), &id) {
            Ok(account) => Json(account).into_response(),
            Err(e) => errors::service_error_to_response(e),
        }
    }
}

pub async fn account_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<BankAccountId>,
) -> axum::response::Response {
    match services.banking.reconstruct_ledger(tenant.tenant_id(), &id) {
        Ok(rows) => Json(serde_json::json!({ "items": rows })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
