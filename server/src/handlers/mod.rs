use axum::http::HeaderMap;
use axum::response::Response;
use serde::Serialize;

use crate::models::Role;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod admin;
pub mod auth;
pub mod temples;
pub mod tokens;

/// Identifies the caller for role-gated routes. This is identification only;
/// nothing here proves the caller owns the address.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "darshan-api",
    };

    success(payload, "Health check successful")
}

/// A resolved caller and the role their requests act with.
#[derive(Debug, Clone)]
pub struct Caller {
    pub email: String,
    pub role: Role,
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An admin grant outranks whatever role the user registered with.
pub(crate) async fn effective_role(
    state: &AppState,
    email: &str,
    registered: Role,
) -> Result<Role, AppError> {
    if state.accounts.is_admin(email).await? {
        Ok(Role::Admin)
    } else {
        Ok(registered)
    }
}

pub(crate) async fn caller(state: &AppState, headers: &HeaderMap) -> Result<Caller, AppError> {
    let email = headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::AuthError(format!("Missing {} header", USER_EMAIL_HEADER)))?;

    let user = state
        .accounts
        .find_user(&email)
        .await?
        .ok_or_else(|| AppError::AuthError("Unknown user".to_string()))?;

    let role = effective_role(state, &email, user.role).await?;
    Ok(Caller { email, role })
}

pub(crate) async fn require_role(
    state: &AppState,
    headers: &HeaderMap,
    allowed: fn(Role) -> bool,
    what: &str,
) -> Result<Caller, AppError> {
    let caller = caller(state, headers).await?;
    if allowed(caller.role) {
        Ok(caller)
    } else {
        tracing::warn!(email = %caller.email, role = %caller.role, "Rejected {}", what);
        Err(AppError::Forbidden(format!(
            "Role '{}' may not {}",
            caller.role, what
        )))
    }
}
