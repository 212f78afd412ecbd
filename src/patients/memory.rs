use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::repo::PatientStore;
use super::repo_types::Patient;
use crate::db::StoreError;

#[derive(Default)]
pub struct MemoryPatientStore {
    rows: Mutex<HashMap<Uuid, Patient>>,
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn list(&self) -> Result<Vec<Patient>, StoreError> {
        let mut out: Vec<Patient> = self.rows.lock().unwrap().values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn find_by_id(&self, patient_id: Uuid) -> Result<Option<Patient>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&patient_id).cloned())
    }

    async fn insert(&self, patient: &Patient) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&patient.patient_id) {
            return Err(StoreError::UniqueViolation("patients_pkey".into()));
        }
        rows.insert(patient.patient_id, patient.clone());
        Ok(())
    }

    async fn update(&self, patient: &Patient) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&patient.patient_id) {
            Some(row) => {
                *row = patient.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, patient_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().remove(&patient_id).is_some())
    }
}
