use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::AccountSummary;

/// Raw registration body. Fields are optional so the validator can report
/// which one is missing.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Raw login body.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Raw profile update body. Outer `None` means the field was omitted,
/// `Some(None)` means it was sent as `null`.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "super::validation::present")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::validation::present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::validation::present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::validation::present")]
    pub full_name: Option<Option<String>>,
}

/// A registration that passed validation.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

/// A login that passed validation.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for AccountChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountChanges")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// Public part of an account returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<AccountSummary> for PublicUser {
    fn from(a: AccountSummary) -> Self {
        Self {
            user_id: a.user_id,
            username: a.username,
            email: a.email,
            full_name: a.full_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
