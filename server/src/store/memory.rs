use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, TokenStore};
use crate::models::{Alert, Token, User};
use crate::utils::error::AppError;

/// Oldest alerts are dropped beyond this many.
const MAX_RETAINED_ALERTS: usize = 256;

#[derive(Default)]
struct Accounts {
    users: HashMap<String, User>,
    admins: HashSet<String>,
    alerts: Vec<Alert>,
}

/// Process-local store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    tokens: RwLock<Vec<Token>>,
    accounts: RwLock<Accounts>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens: RwLock::new(tokens),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Token>, AppError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Token>, AppError> {
        Ok(self.tokens.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, token: &Token) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if tokens.iter().any(|t| t.id == token.id) {
            return Err(AppError::Conflict(format!(
                "Token '{}' already exists",
                token.id
            )));
        }
        tokens.push(token.clone());
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut accounts = self.accounts.write().await;
        if accounts.users.contains_key(&user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        accounts.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.accounts.read().await.users.get(email).cloned())
    }

    async fn clear_users(&self) -> Result<u64, AppError> {
        let mut accounts = self.accounts.write().await;
        let removed = accounts.users.len() as u64;
        accounts.users.clear();
        accounts.admins.clear();
        Ok(removed)
    }

    async fn grant_admin(&self, email: &str) -> Result<(), AppError> {
        self.accounts.write().await.admins.insert(email.to_string());
        Ok(())
    }

    async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.accounts.read().await.admins.contains(email))
    }

    async fn record_alert(&self, alert: &Alert) -> Result<(), AppError> {
        let mut accounts = self.accounts.write().await;
        accounts.alerts.push(alert.clone());
        let excess = accounts.alerts.len().saturating_sub(MAX_RETAINED_ALERTS);
        if excess > 0 {
            accounts.alerts.drain(..excess);
        }
        Ok(())
    }

    async fn recent_alerts(&self, limit: usize) -> Result<Vec<Alert>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.alerts.iter().rev().take(limit).cloned().collect())
    }
}
