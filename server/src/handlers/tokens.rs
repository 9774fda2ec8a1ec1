use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::NewToken;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, listing, success, svg};

pub async fn book_token(
    State(state): State<AppState>,
    Json(booking): Json<NewToken>,
) -> Result<Response, AppError> {
    let token = state.tokens.book(booking).await?;
    Ok(created(token, "Darshan token booked"))
}

pub async fn list_tokens(State(state): State<AppState>) -> Result<Response, AppError> {
    let overview = state.tokens.overview().await?;
    Ok(success(overview, "Tokens retrieved"))
}

pub async fn active_tokens(State(state): State<AppState>) -> Result<Response, AppError> {
    let active = state.tokens.active().await?;
    Ok(listing(active, "Active tokens retrieved", "No active tokens found"))
}

pub async fn token_history(State(state): State<AppState>) -> Result<Response, AppError> {
    let expired = state.tokens.history().await?;
    Ok(listing(expired, "Expired tokens retrieved", "No history found"))
}

pub async fn token_qr(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let markup = state.tokens.qr_svg(id).await?;
    Ok(svg(markup))
}
