use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub user_id: Uuid,                  // assigned once at registration
    pub username: String,              // unique
    pub email: String,                 // unique
    pub password_hash: String,         // Argon2 PHC string, never serialized
    pub full_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Listing projection without credentials.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct AccountSummary {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl From<&Account> for AccountSummary {
    fn from(a: &Account) -> Self {
        Self {
            user_id: a.user_id,
            username: a.username.clone(),
            email: a.email.clone(),
            full_name: a.full_name.clone(),
        }
    }
}
