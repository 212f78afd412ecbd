use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Account, AccountSummary};
use crate::db::StoreError;

/// Point lookups and single-row writes the account directory relies on.
///
/// Implementations must enforce uniqueness of `username` and `email` and
/// report a violation as [`StoreError::UniqueViolation`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    /// True when any account already uses `username` or `email`.
    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, StoreError>;
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;
    /// Returns false when no row matched `account.user_id`.
    async fn update(&self, account: &Account) -> Result<bool, StoreError>;
    /// Returns false when no row matched.
    async fn delete(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError> {
        let rows = sqlx::query_as::<_, AccountSummary>(
            r#"
            SELECT user_id, username, email, full_name
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT user_id, username, email, password_hash, full_name, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT user_id, username, email, password_hash, full_name, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, email, password_hash, full_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.user_id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET username = $2, email = $3, password_hash = $4, full_name = $5, updated_at = $6
             WHERE user_id = $1
            "#,
        )
        .bind(account.user_id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(account.updated_at)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
