use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Patient record in the database.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Patient {
    pub patient_id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub created_by: Uuid, // user_id claim of the creator
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
