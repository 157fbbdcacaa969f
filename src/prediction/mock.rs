//! Placeholder scorer drawing uniform random risk scores.
//!
//! Stands in for trained models until a pipeline artifact is configured.
//! The random source is injected: `mock_estimate` takes the generator as an
//! argument and `MockRiskModel` owns a seedable one.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{RiskEstimate, RiskModel};
use crate::models::{AssessmentInput, DiseaseType};

pub const MOCK_MODEL_VERSION: &str = "v1.0.0-mock";

/// Draw one mock estimate for `disease` from `rng`.
///
/// Every disease draws its score from Uniform(0.1, 0.9). Heart disease also
/// draws confidence from Uniform(0.8, 0.99); the others use fixed values.
pub fn mock_estimate<R: Rng>(disease: DiseaseType, rng: &mut R) -> RiskEstimate {
    let risk_score = rng.gen_range(0.1..=0.9);
    let confidence = match disease {
        DiseaseType::HeartDisease => rng.gen_range(0.8..=0.99),
        DiseaseType::LiverDisease => 0.85,
        DiseaseType::KidneyDisease => 0.88,
        DiseaseType::Diabetes => 0.90,
    };
    RiskEstimate {
        risk_score,
        confidence,
    }
}

pub struct MockRiskModel {
    rng: Mutex<StdRng>,
}

impl MockRiskModel {
    /// Reproducible sequence of draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl RiskModel for MockRiskModel {
    fn model_version(&self) -> &str {
        MOCK_MODEL_VERSION
    }

    fn estimate(&self, input: &AssessmentInput) -> RiskEstimate {
        // A panic mid-draw cannot leave the generator in an invalid state.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        mock_estimate(input.disease_type(), &mut *rng)
    }
}
