//! Disease risk assessment.
//!
//! `POST /ml/predict/{disease}`: score one typed clinical record.
//! `GET /ml/models`: which model serves each disease and how it is read.

use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::types::{ApiContext, ValidatedJson};
use crate::models::{AssessmentInput, AssessmentResult};
use crate::prediction::ModelInfo;

/// Shared handler for the four predict routes. `I` fixes the body schema;
/// a body that does not match it is rejected with 422 before scoring.
pub async fn assess<I>(
    State(ctx): State<ApiContext>,
    ValidatedJson(input): ValidatedJson<I>,
) -> Json<AssessmentResult>
where
    I: DeserializeOwned + Into<AssessmentInput> + Send + 'static,
{
    let input: AssessmentInput = input.into();
    let result = ctx.predictions.predict(&input);
    tracing::info!(
        disease = %result.disease_type,
        category = %result.risk_category,
        model_version = %result.model_version,
        "Risk assessed"
    );
    Json(result)
}

pub async fn models(State(ctx): State<ApiContext>) -> Json<Vec<ModelInfo>> {
    Json(ctx.predictions.describe())
}
