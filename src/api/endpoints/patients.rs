//! Patient intake and listing.
//!
//! `POST /patients/`: register a patient (status starts as `waiting`).
//! `GET /patients/`: all patients in store order.
//! `GET /patients/:patient_id`: one patient.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ValidatedJson};
use crate::models::{Patient, PatientCreate};

/// `POST /patients/`: insert the intake through the store.
///
/// The body schema is the only check made here. The store assigns
/// `patient_id`, `admission_time` and `status`; the response is the row it
/// returned.
pub async fn create(
    State(ctx): State<ApiContext>,
    ValidatedJson(intake): ValidatedJson<PatientCreate>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = ctx.patients.insert(intake).await?;
    tracing::info!(
        patient_id = %patient.patient_id,
        backend = ctx.patients.backend(),
        "Patient admitted"
    );
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /patients/`: an empty table is `[]`, not an error.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = ctx.patients.list().await?;
    Ok(Json(patients))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = Uuid::parse_str(&patient_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid patient ID: {patient_id}")))?;
    let patient = ctx.patients.get(id).await?;
    Ok(Json(patient))
}
