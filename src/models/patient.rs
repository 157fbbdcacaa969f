use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::enums::PatientStatus;

/// Intake payload for `POST /patients`. The schema is the only gate;
/// anything the table itself refuses comes back as a store error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientCreate {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

/// A patient row as returned by the store.
///
/// `patient_id` and `admission_time` are assigned by the store on insert.
/// Rows without a `status` column value read as `waiting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: String,
    #[serde(deserialize_with = "utc_or_naive")]
    pub admission_time: DateTime<Utc>,
    #[serde(default)]
    pub status: PatientStatus,
}

/// `timestamptz` columns carry an offset; plain `timestamp` columns do not
/// and are stored as UTC.
fn utc_or_naive<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid admission_time '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(admission_time: &str) -> serde_json::Value {
        serde_json::json!({
            "patient_id": "5b0c6a34-3f5e-4c33-9d44-6c1a3f0f9e21",
            "name": "Ada Obi",
            "age": 42,
            "gender": "F",
            "admission_time": admission_time,
        })
    }

    #[test]
    fn intake_accepts_any_well_typed_values() {
        let p: PatientCreate =
            serde_json::from_str(r#"{"name":"","age":200,"gender":""}"#).unwrap();
        assert_eq!(p.age, 200);
        assert!(p.name.is_empty());
    }

    #[test]
    fn intake_rejects_unknown_fields() {
        let result: Result<PatientCreate, _> = serde_json::from_str(
            r#"{"name":"A","age":3,"gender":"M","ward":"B2"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn intake_requires_every_field() {
        let result: Result<PatientCreate, _> = serde_json::from_str(r#"{"name":"A","age":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn store_row_without_status_defaults_to_waiting() {
        let mut value = row("2025-03-14T09:26:53.589793+00:00");
        value["created_by"] = "intake-desk".into();
        let patient: Patient = serde_json::from_value(value).unwrap();
        assert_eq!(patient.status, PatientStatus::Waiting);
        assert_eq!(patient.age, 42);
    }

    #[test]
    fn offsetless_admission_time_reads_as_utc() {
        let patient: Patient = serde_json::from_value(row("2025-03-14T09:26:53.589793")).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
            + chrono::Duration::microseconds(589_793);
        assert_eq!(patient.admission_time, expected);
    }

    #[test]
    fn offset_admission_time_is_normalized_to_utc() {
        let patient: Patient = serde_json::from_value(row("2025-03-14T11:26:53+02:00")).unwrap();
        assert_eq!(
            patient.admission_time,
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
        );
    }

    #[test]
    fn garbage_admission_time_is_rejected() {
        let result: Result<Patient, _> = serde_json::from_value(row("last tuesday"));
        assert!(result.is_err());
    }

    #[test]
    fn patient_round_trips_through_json() {
        let patient = Patient {
            patient_id: Uuid::new_v4(),
            name: "B".into(),
            age: 70,
            gender: "M".into(),
            admission_time: Utc::now(),
            status: PatientStatus::InProgress,
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["status"], "in-progress");
        let back: Patient = serde_json::from_value(json).unwrap();
        assert_eq!(back, patient);
    }
}
