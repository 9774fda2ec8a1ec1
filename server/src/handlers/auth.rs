use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{caller, effective_role, normalize_email};
use crate::models::{LoginRequest, PublicUser, RegisterRequest, Role, User};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

const MIN_PASSWORD_LEN: usize = 6;

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalServerError(format!("password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| AppError::InternalServerError(format!("hashing task failed: {}", e)))?
}

async fn verify_password(password: String, stored: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored).map_err(|e| {
            AppError::InternalServerError(format!("stored password hash is corrupt: {}", e))
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::InternalServerError(format!("verification task failed: {}", e)))?
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = normalize_email(&request.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    if request.role == Role::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash: hash_password(request.password).await?,
        role: request.role,
        created_at: state.clock.now()?,
    };
    state.accounts.create_user(&user).await?;

    tracing::info!(email = %user.email, role = %user.role, "User registered");

    Ok(created(PublicUser::from(&user), "User registered"))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = normalize_email(&request.email);
    let user = state
        .accounts
        .find_user(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!(email = %email, "Failed login attempt");
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let role = effective_role(&state, &email, user.role).await?;
    Ok(success(PublicUser { email, role }, "Signed in"))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(rename = "as")]
    pub impersonate: Option<Role>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub email: String,
    pub role: Role,
    pub true_role: Role,
    pub impersonating: bool,
    pub actions: &'static [&'static str],
}

fn dashboard_actions(role: Role) -> &'static [&'static str] {
    match role {
        Role::User => &["book_token", "view_active_tokens", "view_history"],
        Role::Worker => &["view_active_tokens", "verify_token", "view_alerts"],
        Role::Admin => &[
            "view_alerts",
            "send_alert",
            "grant_admin",
            "clear_user_data",
        ],
    }
}

/// Picks the dashboard for the caller. Admins may preview another role's
/// dashboard with `?as=<role>`.
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let caller = caller(&state, &headers).await?;

    let role = match query.impersonate {
        Some(requested) if requested != caller.role => {
            if caller.role != Role::Admin {
                return Err(AppError::Forbidden(
                    "Only admins may view another role's dashboard".to_string(),
                ));
            }
            requested
        }
        _ => caller.role,
    };

    let view = DashboardView {
        email: caller.email,
        role,
        true_role: caller.role,
        impersonating: role != caller.role,
        actions: dashboard_actions(role),
    };
    Ok(success(view, "Dashboard retrieved"))
}
