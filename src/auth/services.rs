use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    claims::Identity,
    dto::{AccountChanges, Credentials, NewAccount},
    jwt::TokenService,
    password,
    repo::AccountStore,
    repo_types::{Account, AccountSummary},
};
use crate::error::AppError;

/// Account CRUD and authentication.
///
/// Existence and uniqueness are checked with explicit reads so callers get
/// `NotFound`/`Conflict` instead of raw storage errors. The store's unique
/// constraints remain the final authority: a violation that slips past the
/// pre-check still surfaces as `Conflict`.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn AccountStore>,
    tokens: TokenService,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, AppError> {
        Ok(self.store.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, user_id: Uuid) -> Result<AccountSummary, AppError> {
        let account = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;
        Ok(AccountSummary::from(&account))
    }

    /// Fails with `Conflict` when the username or email is already in use.
    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register(&self, new: NewAccount) -> Result<Uuid, AppError> {
        if self
            .store
            .username_or_email_taken(&new.username, &new.email)
            .await?
        {
            warn!("username or email already registered");
            return Err(AppError::Conflict("username or email is already taken".into()));
        }

        let password_hash = password::hash(new.password)
            .await
            .context("hash password")?;

        let now = OffsetDateTime::now_utc();
        let account = Account {
            user_id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash,
            full_name: new.full_name,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&account).await?;

        info!(user_id = %account.user_id, "user registered");
        Ok(account.user_id)
    }

    /// Fails with `NotFound` for an unknown username and `InvalidCredential`
    /// when the password does not match.
    #[instrument(skip(self, creds), fields(username = %creds.username))]
    pub async fn authenticate(&self, creds: Credentials) -> Result<String, AppError> {
        let account = self
            .store
            .find_by_username(&creds.username)
            .await?
            .ok_or_else(|| {
                warn!("login for unknown username");
                AppError::not_found("user")
            })?;

        let ok = password::verify(creds.password, account.password_hash.clone())
            .await
            .context("verify password")?;
        if !ok {
            warn!(user_id = %account.user_id, "login with wrong password");
            return Err(AppError::InvalidCredential);
        }

        let token = self
            .tokens
            .issue(&Identity {
                user_id: account.user_id,
                username: account.username.clone(),
            })
            .context("sign token")?;

        info!(user_id = %account.user_id, "user logged in");
        Ok(token)
    }

    /// Applies the supplied fields; omitted ones keep their stored value.
    /// A new password is re-hashed.
    #[instrument(skip(self, changes))]
    pub async fn update_account(&self, user_id: Uuid, changes: AccountChanges) -> Result<(), AppError> {
        let mut account = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(full_name) = changes.full_name {
            account.full_name = full_name;
        }
        if let Some(plain) = changes.password {
            account.password_hash = password::hash(plain).await.context("hash password")?;
        }
        account.updated_at = OffsetDateTime::now_utc();

        if !self.store.update(&account).await? {
            return Err(AppError::not_found("user"));
        }
        info!(%user_id, "user updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.store.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user"));
        }
        if !self.store.delete(user_id).await? {
            return Err(AppError::not_found("user"));
        }
        info!(%user_id, "user deleted");
        Ok(())
    }
}
