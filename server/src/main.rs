use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use darshan_server::clock::SystemClock;
use darshan_server::config::Config;
use darshan_server::registry::TempleRegistry;
use darshan_server::routes::create_routes;
use darshan_server::state::AppState;
use darshan_server::store::{AccountStore, MemoryStore, PgStore, TokenStore};

const DEFAULT_LOG_FILTER: &str = "darshan_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let registry = match &config.temple_data_path {
        Some(path) => TempleRegistry::from_path(path),
        None => TempleRegistry::builtin(),
    }
    .expect("Failed to load temple registry");

    tracing::info!(
        temples = registry.temples().len(),
        slots = registry.slots().len(),
        "Temple registry ready"
    );

    let (token_store, accounts): (Arc<dyn TokenStore>, Arc<dyn AccountStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await
                    .expect("Failed to connect to database");

                tracing::info!("Successfully connected to database");

                let store = Arc::new(PgStore::new(pool));
                store.migrate().await.expect("Failed to run migrations");

                tracing::info!("Migrations run successfully");

                let token_store: Arc<dyn TokenStore> = store.clone();
                let accounts: Arc<dyn AccountStore> = store;
                (token_store, accounts)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, tokens and accounts will not survive a restart");
                let store = Arc::new(MemoryStore::new());
                let token_store: Arc<dyn TokenStore> = store.clone();
                let accounts: Arc<dyn AccountStore> = store;
                (token_store, accounts)
            }
        };

    let state = AppState::new(
        token_store,
        accounts,
        registry,
        Arc::new(SystemClock),
        config.venue,
        config.admin_email.clone(),
    );

    let app: Router = create_routes(state, config.production);

    let addr = config.bind_addr();
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
