//! Disease-risk prediction service.
//!
//! A `RiskModel` produces a raw score and confidence for a typed input. The
//! `PredictionService` owns the output contract: rounding to two decimals,
//! the per-disease threshold table, and the detection flags. Swapping the
//! mock model for a trained pipeline therefore never changes the response
//! shape or the category rules.

pub mod mock;
pub mod pipeline;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{AssessmentInput, AssessmentResult, DiseaseType, RiskCategory};

pub use mock::{mock_estimate, MockRiskModel, MOCK_MODEL_VERSION};
pub use pipeline::{ArtifactError, PipelineRiskModel};

// ═══════════════════════════════════════════════════════════
// Threshold table
// ═══════════════════════════════════════════════════════════

/// One row of a disease's threshold table. Rows are checked top-down and
/// the first match wins; a score matching no row is `LOW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBand {
    pub above: f64,
    pub inclusive: bool,
    pub category: RiskCategory,
}

impl RiskBand {
    const fn over(above: f64, category: RiskCategory) -> Self {
        Self {
            above,
            inclusive: false,
            category,
        }
    }

    const fn at_least(above: f64, category: RiskCategory) -> Self {
        Self {
            above,
            inclusive: true,
            category,
        }
    }

    fn matches(&self, score: f64) -> bool {
        if self.inclusive {
            score >= self.above
        } else {
            score > self.above
        }
    }
}

const HEART_BANDS: [RiskBand; 3] = [
    RiskBand::over(0.8, RiskCategory::Critical),
    RiskBand::over(0.6, RiskCategory::High),
    RiskBand::over(0.4, RiskCategory::Medium),
];

const LIVER_BANDS: [RiskBand; 1] = [RiskBand::at_least(0.5, RiskCategory::High)];

const THREE_TIER_BANDS: [RiskBand; 2] = [
    RiskBand::over(0.7, RiskCategory::High),
    RiskBand::over(0.4, RiskCategory::Medium),
];

pub fn risk_bands(disease: DiseaseType) -> &'static [RiskBand] {
    match disease {
        DiseaseType::HeartDisease => &HEART_BANDS,
        DiseaseType::LiverDisease => &LIVER_BANDS,
        DiseaseType::KidneyDisease | DiseaseType::Diabetes => &THREE_TIER_BANDS,
    }
}

/// Category for a score under the disease's threshold table.
pub fn categorize(disease: DiseaseType, score: f64) -> RiskCategory {
    risk_bands(disease)
        .iter()
        .find(|band| band.matches(score))
        .map(|band| band.category)
        .unwrap_or(RiskCategory::Low)
}

/// Score above which the disease's detection flag is set, if it has one.
pub fn default_detection_threshold(disease: DiseaseType) -> Option<f64> {
    match disease {
        DiseaseType::KidneyDisease => Some(0.5),
        DiseaseType::Diabetes => Some(0.6),
        DiseaseType::HeartDisease | DiseaseType::LiverDisease => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ═══════════════════════════════════════════════════════════
// Models
// ═══════════════════════════════════════════════════════════

/// Raw model output before rounding and categorization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskEstimate {
    pub risk_score: f64,
    pub confidence: f64,
}

/// A scorer for one or more diseases.
pub trait RiskModel: Send + Sync {
    fn model_version(&self) -> &str;

    fn estimate(&self, input: &AssessmentInput) -> RiskEstimate;

    fn detection_threshold(&self, disease: DiseaseType) -> Option<f64> {
        default_detection_threshold(disease)
    }
}

/// What `GET /ml/models` reports per disease.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub disease_type: DiseaseType,
    pub model_version: String,
    pub features: &'static [&'static str],
    pub risk_bands: &'static [RiskBand],
    pub detection_threshold: Option<f64>,
}

/// Routes each input to its disease's model and applies the output contract.
pub struct PredictionService {
    fallback: Box<dyn RiskModel>,
    models: BTreeMap<DiseaseType, Box<dyn RiskModel>>,
}

impl PredictionService {
    /// Service where every disease is scored by `fallback`.
    pub fn new(fallback: impl RiskModel + 'static) -> Self {
        Self {
            fallback: Box::new(fallback),
            models: BTreeMap::new(),
        }
    }

    /// Dedicated model for one disease; other diseases keep the fallback.
    pub fn with_model(mut self, disease: DiseaseType, model: impl RiskModel + 'static) -> Self {
        self.models.insert(disease, Box::new(model));
        self
    }

    pub fn model_for(&self, disease: DiseaseType) -> &dyn RiskModel {
        self.models
            .get(&disease)
            .map(|m| m.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    pub fn predict(&self, input: &AssessmentInput) -> AssessmentResult {
        let disease = input.disease_type();
        let model = self.model_for(disease);
        let estimate = model.estimate(input);

        // Category and flags are derived from the rounded score so that
        // clients can recompute them from the response.
        let risk_score = round2(estimate.risk_score);
        let confidence = round2(estimate.confidence);
        let risk_category = categorize(disease, risk_score);
        let detected = model
            .detection_threshold(disease)
            .map(|threshold| risk_score > threshold);

        let (chronic_kidney_disease, diabetes_detected) = match disease {
            DiseaseType::KidneyDisease => (detected, None),
            DiseaseType::Diabetes => (None, detected),
            DiseaseType::HeartDisease | DiseaseType::LiverDisease => (None, None),
        };

        tracing::debug!(
            disease = %disease,
            risk_score,
            risk_category = %risk_category,
            model_version = model.model_version(),
            "Assessment produced"
        );

        AssessmentResult {
            patient_id: input.patient_id(),
            disease_type: disease,
            risk_score,
            risk_category,
            confidence,
            model_version: model.model_version().to_string(),
            timestamp: chrono::Utc::now(),
            chronic_kidney_disease,
            diabetes_detected,
        }
    }

    pub fn describe(&self) -> Vec<ModelInfo> {
        DiseaseType::ALL
            .iter()
            .map(|&disease| {
                let model = self.model_for(disease);
                ModelInfo {
                    disease_type: disease,
                    model_version: model.model_version().to_string(),
                    features: disease.feature_names(),
                    risk_bands: risk_bands(disease),
                    detection_threshold: model.detection_threshold(disease),
                }
            })
            .collect()
    }
}
