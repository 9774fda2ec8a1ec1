use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::require_role;
use crate::models::{Alert, NewAlert, Role};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, listing, success};

const RECENT_ALERTS: usize = 50;
const MAX_ALERT_LEN: usize = 500;

fn is_admin(role: Role) -> bool {
    role == Role::Admin
}

/// Grants admin to the address configured as `ADMIN_EMAIL`.
pub async fn grant_configured_admin(State(state): State<AppState>) -> Result<Response, AppError> {
    state.accounts.grant_admin(&state.admin_email).await?;
    tracing::info!(email = %state.admin_email, "Admin grant ensured");
    Ok(empty_success("Admin user added to the database."))
}

pub async fn send_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewAlert>,
) -> Result<Response, AppError> {
    let caller = require_role(&state, &headers, is_admin, "send alerts").await?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::ValidationError(
            "Alert message is required".to_string(),
        ));
    }
    if message.chars().count() > MAX_ALERT_LEN {
        return Err(AppError::ValidationError(format!(
            "Alert message must be at most {} characters",
            MAX_ALERT_LEN
        )));
    }

    let alert = Alert {
        id: Uuid::new_v4(),
        message: message.to_string(),
        sent_by: caller.email,
        created_at: state.clock.now()?,
    };
    state.accounts.record_alert(&alert).await?;

    tracing::warn!(alert_id = %alert.id, sent_by = %alert.sent_by, message = %alert.message, "Emergency alert broadcast");

    Ok(created(alert, "Emergency alert sent"))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    require_role(&state, &headers, Role::is_staff, "view alerts").await?;
    let alerts = state.accounts.recent_alerts(RECENT_ALERTS).await?;
    Ok(listing(alerts, "Alerts retrieved", "No alerts sent"))
}

#[derive(Serialize)]
struct ClearedUsers {
    removed: u64,
}

/// Deletes every user and admin grant, the caller included.
pub async fn clear_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let caller = require_role(&state, &headers, is_admin, "clear user data").await?;
    let removed = state.accounts.clear_users().await?;

    tracing::warn!(by = %caller.email, removed, "All user data cleared");

    Ok(success(
        ClearedUsers { removed },
        "All user data has been cleared.",
    ))
}
