use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::validation::{not_empty, optional, present, required, Schema};

const AGE_MAX: i32 = 150;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdatePatientRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
}

#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPatient {
    pub patient_id: Uuid,
}

fn check_age(age: &i32) -> Result<(), String> {
    if !(0..=AGE_MAX).contains(age) {
        return Err(format!("age must be between 0 and {}", AGE_MAX));
    }
    Ok(())
}

impl Schema for NewPatient {
    type Raw = CreatePatientRequest;

    fn check(raw: CreatePatientRequest) -> Result<Self, String> {
        let name = required("name", raw.name)?;
        let age = raw.age.ok_or_else(|| "age is required".to_string())?;
        check_age(&age)?;
        Ok(Self {
            name,
            age,
            gender: required("gender", raw.gender)?,
            address: required("address", raw.address)?,
        })
    }
}

impl Schema for PatientChanges {
    type Raw = UpdatePatientRequest;

    fn check(raw: UpdatePatientRequest) -> Result<Self, String> {
        Ok(Self {
            name: optional("name", raw.name, |v| not_empty("name", v))?,
            age: optional("age", raw.age, check_age)?,
            gender: optional("gender", raw.gender, |v| not_empty("gender", v))?,
            address: optional("address", raw.address, |v| not_empty("address", v))?,
        })
    }
}
