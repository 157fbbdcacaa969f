//! Trained pipeline scorer loaded from a JSON artifact.
//!
//! The artifact bundles what offline training produces: the ordered feature
//! names, the standard-scaler parameters, and a logistic classifier. Feature
//! names are either an input field (`"Glucose"`) or a one-hot indicator
//! (`"chest_pain_type=2"`, 1.0 when the field equals the value).
//!
//! ```json
//! {
//!   "disease_type": "diabetes",
//!   "model_version": "logreg-2025.03",
//!   "feature_names": ["Glucose", "BMI", "Age"],
//!   "scaler": { "mean": [120.9, 32.0, 33.2], "scale": [31.9, 7.9, 11.8] },
//!   "classifier": { "coefficients": [1.1, 0.7, 0.4], "intercept": -0.8 },
//!   "threshold": 0.4
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{default_detection_threshold, RiskEstimate, RiskModel};
use crate::models::{AssessmentInput, DiseaseType};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Cannot read pipeline artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed pipeline artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pipeline artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct PipelineArtifact {
    disease_type: DiseaseType,
    model_version: String,
    feature_names: Vec<String>,
    scaler: ScalerParams,
    classifier: LogisticParams,
    #[serde(default)]
    threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct LogisticParams {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// How one artifact column is read from the input's feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Value(usize),
    Indicator { index: usize, equals: f64 },
}

impl Column {
    fn resolve(disease: DiseaseType, name: &str) -> Result<Self, ArtifactError> {
        let position = |field: &str| {
            disease
                .feature_names()
                .iter()
                .position(|f| *f == field)
                .ok_or_else(|| {
                    ArtifactError::Invalid(format!("unknown {disease} feature '{field}'"))
                })
        };

        match name.split_once('=') {
            Some((field, value)) => {
                let equals = value.trim().parse::<f64>().map_err(|_| {
                    ArtifactError::Invalid(format!(
                        "indicator '{name}' needs a numeric value"
                    ))
                })?;
                Ok(Self::Indicator {
                    index: position(field.trim())?,
                    equals,
                })
            }
            None => Ok(Self::Value(position(name)?)),
        }
    }

    fn read(&self, values: &[f64]) -> f64 {
        match *self {
            Self::Value(index) => values.get(index).copied().unwrap_or(0.0),
            Self::Indicator { index, equals } => match values.get(index) {
                Some(v) if *v == equals => 1.0,
                _ => 0.0,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineRiskModel {
    disease: DiseaseType,
    model_version: String,
    columns: Vec<Column>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: Option<f64>,
}

impl PipelineRiskModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            disease = %model.disease,
            model_version = %model.model_version,
            features = model.columns.len(),
            "Pipeline artifact loaded"
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, ArtifactError> {
        let artifact: PipelineArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(a: PipelineArtifact) -> Result<Self, ArtifactError> {
        let n = a.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::Invalid("no feature names".into()));
        }
        for (what, len) in [
            ("scaler.mean", a.scaler.mean.len()),
            ("scaler.scale", a.scaler.scale.len()),
            ("classifier.coefficients", a.classifier.coefficients.len()),
        ] {
            if len != n {
                return Err(ArtifactError::Invalid(format!(
                    "{what} has {len} entries, expected {n}"
                )));
            }
        }
        if let Some(i) = a.scaler.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ArtifactError::Invalid(format!(
                "scaler.scale for '{}' must be finite and non-zero",
                a.feature_names[i]
            )));
        }
        if let Some(t) = a.threshold {
            if !(t > 0.0 && t < 1.0) {
                return Err(ArtifactError::Invalid(format!(
                    "threshold must lie strictly between 0 and 1 (got {t})"
                )));
            }
        }

        let columns = a
            .feature_names
            .iter()
            .map(|name| Column::resolve(a.disease_type, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            disease: a.disease_type,
            model_version: a.model_version,
            columns,
            mean: a.scaler.mean,
            scale: a.scaler.scale,
            coefficients: a.classifier.coefficients,
            intercept: a.classifier.intercept,
            threshold: a.threshold,
        })
    }

    pub fn disease(&self) -> DiseaseType {
        self.disease
    }

    /// Positive-class probability for an input of this model's disease.
    pub fn probability(&self, input: &AssessmentInput) -> f64 {
        let values = input.feature_vector();
        let z = self
            .columns
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.coefficients)
            .map(|(((column, mean), scale), coef)| coef * (column.read(&values) - mean) / scale)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

impl RiskModel for PipelineRiskModel {
    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn estimate(&self, input: &AssessmentInput) -> RiskEstimate {
        let p = self.probability(input);
        RiskEstimate {
            risk_score: p,
            confidence: p.max(1.0 - p),
        }
    }

    fn detection_threshold(&self, disease: DiseaseType) -> Option<f64> {
        default_detection_threshold(disease).map(|default| self.threshold.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiabetesInput, HeartDiseaseInput, RiskCategory};
    use crate::prediction::{categorize, PredictionService};
    use std::io::Write;

    fn diabetes(glucose: i32) -> AssessmentInput {
        DiabetesInput {
            patient_id: None,
            pregnancies: 2,
            glucose,
            blood_pressure: 70,
            skin_thickness: 20,
            insulin: 80,
            bmi: 28.5,
            diabetes_pedigree_function: 0.5,
            age: 33,
        }
        .into()
    }

    fn heart(chest_pain_type: i32) -> AssessmentInput {
        HeartDiseaseInput {
            patient_id: None,
            age: 63,
            sex: 1,
            chest_pain_type,
            resting_bp: 145,
            cholesterol: 233,
            fasting_blood_sugar: 1,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_angina: 0,
            st_depression: 2.3,
            st_slope: 0,
            major_vessels: 0,
            thalassemia: 1,
        }
        .into()
    }

    const GLUCOSE_ARTIFACT: &str = r#"{
        "disease_type": "diabetes",
        "model_version": "logreg-test",
        "feature_names": ["Glucose"],
        "scaler": { "mean": [100.0], "scale": [20.0] },
        "classifier": { "coefficients": [2.0], "intercept": 0.0 }
    }"#;

    #[test]
    fn probability_matches_hand_computed_logistic() {
        let model = PipelineRiskModel::from_json(GLUCOSE_ARTIFACT).unwrap();
        // z = 2.0 * (120 - 100) / 20 = 2.0
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((model.probability(&diabetes(120)) - expected).abs() < 1e-12);
        // At the mean the probability is 0.5
        assert!((model.probability(&diabetes(100)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn confidence_is_distance_from_undecided() {
        let model = PipelineRiskModel::from_json(GLUCOSE_ARTIFACT).unwrap();
        let low = model.estimate(&diabetes(60));
        assert!(low.risk_score < 0.5);
        assert_eq!(low.confidence, 1.0 - low.risk_score);
    }

    #[test]
    fn indicator_columns_read_one_hot() {
        let raw = r#"{
            "disease_type": "heart-disease",
            "model_version": "onehot",
            "feature_names": ["chest_pain_type=3"],
            "scaler": { "mean": [0.0], "scale": [1.0] },
            "classifier": { "coefficients": [4.0], "intercept": -2.0 }
        }"#;
        let model = PipelineRiskModel::from_json(raw).unwrap();
        let hit = model.probability(&heart(3));
        let miss = model.probability(&heart(1));
        assert!((hit - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
        assert!((miss - 1.0 / (1.0 + 2.0f64.exp())).abs() < 1e-12);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let raw = GLUCOSE_ARTIFACT.replace("\"Glucose\"", "\"Cholesterol\"");
        let err = PipelineRiskModel::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("Cholesterol"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let raw = GLUCOSE_ARTIFACT.replace("[2.0]", "[2.0, 1.0]");
        let err = PipelineRiskModel::from_json(&raw).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let raw = GLUCOSE_ARTIFACT.replace("[20.0]", "[0.0]");
        assert!(PipelineRiskModel::from_json(&raw).is_err());
    }

    #[test]
    fn non_numeric_indicator_is_rejected() {
        let raw = GLUCOSE_ARTIFACT.replace("\"Glucose\"", "\"Glucose=high\"");
        assert!(PipelineRiskModel::from_json(&raw).is_err());
    }

    #[test]
    fn artifact_threshold_drives_detection_flag() {
        let raw = GLUCOSE_ARTIFACT.replace(
            "\"intercept\": 0.0 }",
            "\"intercept\": 0.0 }, \"threshold\": 0.4",
        );
        let model = PipelineRiskModel::from_json(&raw).unwrap();
        assert_eq!(model.detection_threshold(DiseaseType::Diabetes), Some(0.4));
        assert_eq!(model.detection_threshold(DiseaseType::HeartDisease), None);
    }

    #[test]
    fn service_applies_contract_to_pipeline_output() {
        let model = PipelineRiskModel::from_json(GLUCOSE_ARTIFACT).unwrap();
        let service = PredictionService::new(crate::prediction::MockRiskModel::seeded(1))
            .with_model(model.disease(), model);

        let result = service.predict(&diabetes(180));
        assert_eq!(result.model_version, "logreg-test");
        assert_eq!(result.risk_category, categorize(DiseaseType::Diabetes, result.risk_score));
        assert_eq!(result.risk_category, RiskCategory::High);
        assert_eq!(result.diabetes_detected, Some(true));
    }

    #[test]
    fn load_reads_artifact_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GLUCOSE_ARTIFACT.as_bytes()).unwrap();
        let model = PipelineRiskModel::load(file.path()).unwrap();
        assert_eq!(model.disease(), DiseaseType::Diabetes);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PipelineRiskModel::load("/nonexistent/artifact.json").unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
