use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Patient;
use crate::db::StoreError;

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Patient>, StoreError>;
    async fn find_by_id(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError>;
    async fn insert(&self, patient: &Patient) -> Result<(), StoreError>;
    /// Returns false when no row matched.
    async fn update(&self, patient: &Patient) -> Result<bool, StoreError>;
    /// Returns false when no row matched.
    async fn delete(&self, patient_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgPatientStore {
    db: PgPool,
}

impl PgPatientStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        let rows = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, name, age, gender, address, created_by, created_at, updated_at
            FROM patients
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError> {
        let row = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, name, age, gender, address, created_by, created_at, updated_at
            FROM patients
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, p: &Patient) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO patients (patient_id, name, age, gender, address, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(p.patient_id)
        .bind(&p.name)
        .bind(p.age)
        .bind(&p.gender)
        .bind(&p.address)
        .bind(p.created_by)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update(&self, p: &Patient) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE patients
               SET name = $2, age = $3, gender = $4, address = $5, updated_at = $6
             WHERE patient_id = $1
            "#,
        )
        .bind(p.patient_id)
        .bind(&p.name)
        .bind(p.age)
        .bind(&p.gender)
        .bind(&p.address)
        .bind(p.updated_at)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, patient_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM patients WHERE patient_id = $1")
            .bind(patient_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
