use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreatedPatient, NewPatient, PatientChanges},
    repo_types::Patient,
};
use crate::{
    auth::{
        middleware::{require_auth, AuthUser},
        validation::Validated,
    },
    error::{AppError, Envelope},
    state::AppState,
};

/// Every patient route sits behind the auth gate.
pub fn patient_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("patient"))
}

async fn load(state: &AppState, id: &str) -> Result<Patient, AppError> {
    state
        .patients
        .find_by_id(parse_id(id)?)
        .await?
        .ok_or_else(|| AppError::not_found("patient"))
}

#[instrument(skip(state, payload))]
pub async fn create_patient(
    State(state): State<AppState>,
    AuthUser(who): AuthUser,
    Validated(payload): Validated<NewPatient>,
) -> Result<(StatusCode, Json<Envelope<CreatedPatient>>), AppError> {
    let now = OffsetDateTime::now_utc();
    let patient = Patient {
        patient_id: Uuid::new_v4(),
        name: payload.name,
        age: payload.age,
        gender: payload.gender,
        address: payload.address,
        created_by: who.user_id,
        created_at: now,
        updated_at: now,
    };
    state.patients.insert(&patient).await?;

    info!(patient_id = %patient.patient_id, "patient created");
    Ok((
        StatusCode::CREATED,
        Envelope::success(
            "patient created",
            CreatedPatient {
                patient_id: patient.patient_id,
            },
        ),
    ))
}

#[instrument(skip(state))]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Patient>>>, AppError> {
    let rows = state.patients.list().await?;
    Ok(Envelope::success("patients retrieved", rows))
}

#[instrument(skip(state))]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Patient>>, AppError> {
    let patient = load(&state, &id).await?;
    Ok(Envelope::success("patient retrieved", patient))
}

#[instrument(skip(state, payload))]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Validated(payload): Validated<PatientChanges>,
) -> Result<Json<Envelope<()>>, AppError> {
    let mut patient = load(&state, &id).await?;
    if let Some(name) = payload.name {
        patient.name = name;
    }
    if let Some(age) = payload.age {
        patient.age = age;
    }
    if let Some(gender) = payload.gender {
        patient.gender = gender;
    }
    if let Some(address) = payload.address {
        patient.address = address;
    }
    patient.updated_at = OffsetDateTime::now_utc();

    if !state.patients.update(&patient).await? {
        return Err(AppError::not_found("patient"));
    }
    Ok(Envelope::ok("patient updated"))
}

#[instrument(skip(state))]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, AppError> {
    if !state.patients.delete(parse_id(&id)?).await? {
        return Err(AppError::not_found("patient"));
    }
    info!(patient_id = %id, "patient deleted");
    Ok(Envelope::ok("patient deleted"))
}
