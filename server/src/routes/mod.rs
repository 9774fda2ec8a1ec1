use axum::http::{header, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{admin, auth, health_check, temples, tokens};
use crate::state::AppState;

/// Token listings depend on the current time and must never be served stale.
fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tokens", get(tokens::list_tokens).post(tokens::book_token))
        .route("/api/tokens/active", get(tokens::active_tokens))
        .route("/api/tokens/history", get(tokens::token_history))
        .route("/api/tokens/:id/qr", get(tokens::token_qr))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

pub fn create_routes(state: AppState, production: bool) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/temples", get(temples::list_temples))
        .route("/api/temples/:id", get(temples::get_temple))
        .route("/api/slots", get(temples::list_slots))
        .merge(token_routes())
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/dashboard", get(auth::dashboard))
        .route("/api/admins", post(admin::grant_configured_admin))
        .route(
            "/api/alerts",
            get(admin::list_alerts).post(admin::send_alert),
        )
        .route("/api/users/clear", post(admin::clear_users))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(production))
        .layer(create_cors_layer())
}
