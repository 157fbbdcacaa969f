//! Typed clinical inputs, one closed record per disease.
//!
//! Every record rejects unknown fields and requires every clinical field.
//! Integer fields reject fractional JSON numbers; float fields accept both.
//! The optional `patient_id` links the resulting assessment to a patient.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DiseaseType;

/// Declares a clinical input record together with its ordered feature names.
/// Feature order is the declaration order and is what pipeline artifacts index.
macro_rules! clinical_input {
    (
        $(#[$meta:meta])*
        $name:ident for $disease:expr => {
            $($field:ident: $ty:ty => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub patient_id: Option<Uuid>,
            $(
                #[serde(rename = $wire)]
                pub $field: $ty,
            )+
        }

        impl $name {
            pub const DISEASE: DiseaseType = $disease;
            pub const FEATURE_NAMES: &'static [&'static str] = &[$($wire),+];

            /// Feature values in `FEATURE_NAMES` order.
            pub fn feature_vector(&self) -> Vec<f64> {
                vec![$(f64::from(self.$field)),+]
            }
        }
    };
}

clinical_input!(
    /// UCI heart disease attributes.
    HeartDiseaseInput for DiseaseType::HeartDisease => {
        age: i32 => "age",
        sex: i32 => "sex",
        chest_pain_type: i32 => "chest_pain_type",
        resting_bp: i32 => "resting_bp",
        cholesterol: i32 => "cholesterol",
        fasting_blood_sugar: i32 => "fasting_blood_sugar",
        resting_ecg: i32 => "resting_ecg",
        max_heart_rate: i32 => "max_heart_rate",
        exercise_angina: i32 => "exercise_angina",
        st_depression: f64 => "st_depression",
        st_slope: i32 => "st_slope",
        major_vessels: i32 => "major_vessels",
        thalassemia: i32 => "thalassemia",
    }
);

clinical_input!(
    /// Indian liver patient panel.
    LiverDiseaseInput for DiseaseType::LiverDisease => {
        age: i32 => "Age",
        gender: i32 => "Gender",
        total_bilirubin: f64 => "Total_Bilirubin",
        direct_bilirubin: f64 => "Direct_Bilirubin",
        alkaline_phosphotase: i32 => "Alkaline_Phosphotase",
        alamine_aminotransferase: i32 => "Alamine_Aminotransferase",
        aspartate_aminotransferase: i32 => "Aspartate_Aminotransferase",
        total_protiens: f64 => "Total_Protiens",
        albumin: f64 => "Albumin",
        albumin_globulin_ratio: f64 => "Albumin_Globulin_Ratio",
    }
);

clinical_input!(
    /// Chronic kidney disease panel (24 attributes, categorical ones encoded as integers).
    KidneyDiseaseInput for DiseaseType::KidneyDisease => {
        age: i32 => "Age",
        blood_pressure: i32 => "Blood_Pressure",
        specific_gravity: f64 => "Specific_Gravity",
        albumin: i32 => "Albumin",
        sugar: i32 => "Sugar",
        red_blood_cells: i32 => "Red_Blood_Cells",
        pus_cells: i32 => "Pus_Cells",
        pus_cell_clumps: i32 => "Pus_Cell_Clumps",
        bacteria: i32 => "Bacteria",
        blood_glucose_random: i32 => "Blood_Glucose_Random",
        blood_urea: i32 => "Blood_Urea",
        serum_creatinine: f64 => "Serum_Creatinine",
        sodium: i32 => "Sodium",
        potassium: f64 => "Potassium",
        hemoglobin: f64 => "Hemoglobin",
        packed_cell_volume: i32 => "Packed_Cell_Volume",
        white_blood_cell_count: i32 => "White_Blood_Cell_Count",
        red_blood_cell_count: f64 => "Red_Blood_Cell_Count",
        hypertension: i32 => "Hypertension",
        diabetes_mellitus: i32 => "Diabetes_Mellitus",
        coronary_artery_disease: i32 => "Coronary_Artery_Disease",
        appetite: i32 => "Appetite",
        pedal_edema: i32 => "Pedal_Edema",
        anemia: i32 => "Anemia",
    }
);

clinical_input!(
    /// Pima diabetes attributes.
    DiabetesInput for DiseaseType::Diabetes => {
        pregnancies: i32 => "Pregnancies",
        glucose: i32 => "Glucose",
        blood_pressure: i32 => "BloodPressure",
        skin_thickness: i32 => "SkinThickness",
        insulin: i32 => "Insulin",
        bmi: f64 => "BMI",
        diabetes_pedigree_function: f64 => "DiabetesPedigreeFunction",
        age: i32 => "Age",
    }
);

impl DiseaseType {
    /// Ordered feature names of this disease's input record.
    pub fn feature_names(self) -> &'static [&'static str] {
        match self {
            Self::HeartDisease => HeartDiseaseInput::FEATURE_NAMES,
            Self::LiverDisease => LiverDiseaseInput::FEATURE_NAMES,
            Self::KidneyDisease => KidneyDiseaseInput::FEATURE_NAMES,
            Self::Diabetes => DiabetesInput::FEATURE_NAMES,
        }
    }
}

/// A validated input for any supported disease.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentInput {
    Heart(HeartDiseaseInput),
    Liver(LiverDiseaseInput),
    Kidney(KidneyDiseaseInput),
    Diabetes(DiabetesInput),
}

impl AssessmentInput {
    pub fn disease_type(&self) -> DiseaseType {
        match self {
            Self::Heart(_) => HeartDiseaseInput::DISEASE,
            Self::Liver(_) => LiverDiseaseInput::DISEASE,
            Self::Kidney(_) => KidneyDiseaseInput::DISEASE,
            Self::Diabetes(_) => DiabetesInput::DISEASE,
        }
    }

    pub fn patient_id(&self) -> Option<Uuid> {
        match self {
            Self::Heart(i) => i.patient_id,
            Self::Liver(i) => i.patient_id,
            Self::Kidney(i) => i.patient_id,
            Self::Diabetes(i) => i.patient_id,
        }
    }

    /// Feature values ordered as `self.disease_type().feature_names()`.
    pub fn feature_vector(&self) -> Vec<f64> {
        match self {
            Self::Heart(i) => i.feature_vector(),
            Self::Liver(i) => i.feature_vector(),
            Self::Kidney(i) => i.feature_vector(),
            Self::Diabetes(i) => i.feature_vector(),
        }
    }
}

impl From<HeartDiseaseInput> for AssessmentInput {
    fn from(input: HeartDiseaseInput) -> Self {
        Self::Heart(input)
    }
}

impl From<LiverDiseaseInput> for AssessmentInput {
    fn from(input: LiverDiseaseInput) -> Self {
        Self::Liver(input)
    }
}

impl From<KidneyDiseaseInput> for AssessmentInput {
    fn from(input: KidneyDiseaseInput) -> Self {
        Self::Kidney(input)
    }
}

impl From<DiabetesInput> for AssessmentInput {
    fn from(input: DiabetesInput) -> Self {
        Self::Diabetes(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diabetes_json() -> serde_json::Value {
        json!({
            "Pregnancies": 2, "Glucose": 120, "BloodPressure": 70, "SkinThickness": 20,
            "Insulin": 80, "BMI": 28.5, "DiabetesPedigreeFunction": 0.5, "Age": 33
        })
    }

    #[test]
    fn feature_counts_match_panels() {
        assert_eq!(DiseaseType::HeartDisease.feature_names().len(), 13);
        assert_eq!(DiseaseType::LiverDisease.feature_names().len(), 10);
        assert_eq!(DiseaseType::KidneyDisease.feature_names().len(), 24);
        assert_eq!(DiseaseType::Diabetes.feature_names().len(), 8);
    }

    #[test]
    fn diabetes_parses_and_orders_features() {
        let input: DiabetesInput = serde_json::from_value(diabetes_json()).unwrap();
        assert_eq!(input.patient_id, None);
        assert_eq!(
            input.feature_vector(),
            vec![2.0, 120.0, 70.0, 20.0, 80.0, 28.5, 0.5, 33.0]
        );
    }

    #[test]
    fn string_where_number_expected_is_rejected() {
        let mut body = diabetes_json();
        body["Glucose"] = json!("high");
        assert!(serde_json::from_value::<DiabetesInput>(body).is_err());
    }

    #[test]
    fn fraction_in_integer_field_is_rejected() {
        let mut body = diabetes_json();
        body["Pregnancies"] = json!(2.5);
        assert!(serde_json::from_value::<DiabetesInput>(body).is_err());
    }

    #[test]
    fn integer_in_float_field_is_accepted() {
        let mut body = diabetes_json();
        body["BMI"] = json!(28);
        let input: DiabetesInput = serde_json::from_value(body).unwrap();
        assert_eq!(input.bmi, 28.0);
    }

    #[test]
    fn missing_liver_field_is_rejected() {
        let body = json!({
            "Age": 45, "Gender": 1, "Total_Bilirubin": 0.7, "Direct_Bilirubin": 0.1,
            "Alkaline_Phosphotase": 187, "Alamine_Aminotransferase": 16,
            "Aspartate_Aminotransferase": 18, "Total_Protiens": 6.8, "Albumin": 3.3
        });
        let err = serde_json::from_value::<LiverDiseaseInput>(body).unwrap_err();
        assert!(err.to_string().contains("Albumin_Globulin_Ratio"));
    }

    #[test]
    fn unknown_heart_field_is_rejected() {
        let body = json!({
            "age": 63, "sex": 1, "chest_pain_type": 3, "resting_bp": 145, "cholesterol": 233,
            "fasting_blood_sugar": 1, "resting_ecg": 0, "max_heart_rate": 150,
            "exercise_angina": 0, "st_depression": 2.3, "st_slope": 0, "major_vessels": 0,
            "thalassemia": 1, "smoker": 1
        });
        assert!(serde_json::from_value::<HeartDiseaseInput>(body).is_err());
    }

    #[test]
    fn patient_id_is_carried_through() {
        let id = Uuid::new_v4();
        let mut body = diabetes_json();
        body["patient_id"] = json!(id);
        let input: AssessmentInput = serde_json::from_value::<DiabetesInput>(body)
            .unwrap()
            .into();
        assert_eq!(input.patient_id(), Some(id));
        assert_eq!(input.disease_type(), DiseaseType::Diabetes);
    }
}
