//! Shared types for the API layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::config::{Settings, StoreSettings};
use crate::db::{InMemoryPatientStore, PatientStore, RestTableStore};
use crate::prediction::{ArtifactError, MockRiskModel, PipelineRiskModel, PredictionService};
use crate::AppError;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes. Cloned per request; everything
/// inside is behind an `Arc`.
#[derive(Clone)]
pub struct ApiContext {
    pub patients: Arc<dyn PatientStore>,
    pub predictions: Arc<PredictionService>,
    pub project_name: Arc<str>,
    pub api_prefix: Arc<str>,
}

impl ApiContext {
    pub fn new(
        patients: Arc<dyn PatientStore>,
        predictions: PredictionService,
        project_name: &str,
        api_prefix: &str,
    ) -> Self {
        Self {
            patients,
            predictions: Arc::new(predictions),
            project_name: Arc::from(project_name),
            api_prefix: Arc::from(api_prefix),
        }
    }

    /// Wire the configured store and models.
    ///
    /// The mock model scores every disease unless a pipeline artifact was
    /// configured for it. A seed makes the mock draws reproducible.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let patients: Arc<dyn PatientStore> = match &settings.store {
            StoreSettings::Remote(cfg) => Arc::new(RestTableStore::new(cfg)?),
            StoreSettings::Memory => {
                tracing::warn!("Using in-memory patient store; data is lost on restart");
                Arc::new(InMemoryPatientStore::new())
            }
        };

        let mock = match settings.prediction_seed {
            Some(seed) => MockRiskModel::seeded(seed),
            None => MockRiskModel::from_entropy(),
        };
        let mut predictions = PredictionService::new(mock);
        let mut covered = BTreeSet::new();
        for path in &settings.model_artifacts {
            let model = PipelineRiskModel::load(path)?;
            if !covered.insert(model.disease()) {
                return Err(ArtifactError::Invalid(format!(
                    "{} configures a second model for {}",
                    path.display(),
                    model.disease()
                ))
                .into());
            }
            predictions = predictions.with_model(model.disease(), model);
        }

        Ok(Self::new(
            patients,
            predictions,
            &settings.project_name,
            &settings.api_prefix,
        ))
    }
}

// ═══════════════════════════════════════════════════════════
// Strict JSON extraction
// ═══════════════════════════════════════════════════════════

/// `Json<T>` whose every rejection (bad syntax, missing or unknown field,
/// wrong type, missing content type) becomes a 422 `ApiError::Validation`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
