use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountStore, TokenStore};
use crate::models::{Alert, Token, User, UserRow};
use crate::utils::error::AppError;

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl TokenStore for PgStore {
    async fn all(&self) -> Result<Vec<Token>, AppError> {
        let tokens = sqlx::query_as::<_, Token>(
            "SELECT id, temple, name, date, time_slot, created_at FROM tokens ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Token>, AppError> {
        let token = sqlx::query_as::<_, Token>(
            "SELECT id, temple, name, date, time_slot, created_at FROM tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn insert(&self, token: &Token) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tokens (id, temple, name, date, time_slot, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(token.id)
        .bind(&token.temple)
        .bind(&token.name)
        .bind(token.date)
        .bind(&token.time_slot)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Token '{}' already exists", token.id))
            } else {
                AppError::DatabaseError(e)
            }
        })?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User already exists".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from)
            .transpose()
            .map_err(AppError::InternalServerError)
    }

    async fn clear_users(&self) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM admins").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn grant_admin(&self, email: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO admins (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admins WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn record_alert(&self, alert: &Alert) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO alerts (id, message, sent_by, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(alert.id)
        .bind(&alert.message)
        .bind(&alert.sent_by)
        .bind(alert.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_alerts(&self, limit: usize) -> Result<Vec<Alert>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT id, message, sent_by, created_at FROM alerts \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(alerts)
    }
}
