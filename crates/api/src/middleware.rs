use std::str::FromStr;

use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use munim_core::{TenantId, UserId};

use crate::context::{TenantContext, UserContext};

const TENANT_HEADER: &str = "x-tenant-id";
const USER_HEADER: &str = "x-user-id";

/// Resolve the tenant and acting user from headers.
///
/// The gateway in front of this service authenticates the caller and forwards
/// the resolved identifiers; anything missing or malformed here is a 401.
pub async fn tenant_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let tenant_id: TenantId = extract_id(req.headers(), TENANT_HEADER)?;
    let user_id: UserId = extract_id(req.headers(), USER_HEADER)?;

    req.extensions_mut().insert(TenantContext::new(tenant_id));
    req.extensions_mut().insert(UserContext::new(user_id));

    Ok(next.run(req).await)
}

fn extract_id<T: FromStr>(headers: &HeaderMap, name: &str) -> Result<T, StatusCode> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .ok_or(StatusCode::UNAUTHORIZED)
}
