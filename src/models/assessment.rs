use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DiseaseType, RiskCategory};

/// Output of a disease-risk prediction. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    pub disease_type: DiseaseType,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub confidence: f64,
    pub model_version: String,
    pub timestamp: DateTime<Utc>,
    /// Kidney assessments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chronic_kidney_disease: Option<bool>,
    /// Diabetes assessments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diabetes_detected: Option<bool>,
}
