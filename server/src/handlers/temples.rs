use axum::extract::{Path, State};
use axum::response::Response;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_temples(State(state): State<AppState>) -> Response {
    success(state.tokens.registry().temples(), "Temples retrieved")
}

pub async fn get_temple(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let temple = state
        .tokens
        .registry()
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Temple '{}' was not found", id)))?;

    Ok(success(temple, "Temple retrieved"))
}

pub async fn list_slots(State(state): State<AppState>) -> Response {
    success(state.tokens.registry().slots(), "Time slots retrieved")
}
