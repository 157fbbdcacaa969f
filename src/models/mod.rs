//! Domain records shared by the API, the repository and the prediction service.

pub mod assessment;
pub mod enums;
pub mod inputs;
pub mod patient;

pub use assessment::AssessmentResult;
pub use enums::{DiseaseType, PatientStatus, RiskCategory};
pub use inputs::{
    AssessmentInput, DiabetesInput, HeartDiseaseInput, KidneyDiseaseInput, LiverDiseaseInput,
};
pub use patient::{Patient, PatientCreate};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
