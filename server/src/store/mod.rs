//! Persistence seams. Everything above this module talks to the traits,
//! never to a concrete backend.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Alert, Token, User};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Full snapshot of every issued token, in insertion order.
    async fn all(&self) -> Result<Vec<Token>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Token>, AppError>;

    async fn insert(&self, token: &Token) -> Result<(), AppError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with [`AppError::Conflict`] when the email is already registered.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Removes every user and admin grant, returning how many users went.
    async fn clear_users(&self) -> Result<u64, AppError>;

    async fn grant_admin(&self, email: &str) -> Result<(), AppError>;

    async fn is_admin(&self, email: &str) -> Result<bool, AppError>;

    async fn record_alert(&self, alert: &Alert) -> Result<(), AppError>;

    /// Newest first.
    async fn recent_alerts(&self, limit: usize) -> Result<Vec<Alert>, AppError>;
}
