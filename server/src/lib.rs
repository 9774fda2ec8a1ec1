pub mod clock;
pub mod config;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;
pub mod store;
pub mod tokens;
pub mod utils;
