//! Process-local patient table for demos and tests.

use std::sync::RwLock;

use futures_util::future::{self, BoxFuture, FutureExt};
use uuid::Uuid;

use super::{PatientStore, StoreError};
use crate::models::{Patient, PatientCreate, PatientStatus};

/// Keeps rows in insertion order. Ids and admission times are assigned here
/// the way the remote store assigns them.
#[derive(Default)]
pub struct InMemoryPatientStore {
    rows: RwLock<Vec<Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_row(&self, patient: PatientCreate) -> Result<Patient, StoreError> {
        let row = Patient {
            patient_id: Uuid::new_v4(),
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            admission_time: chrono::Utc::now(),
            status: PatientStatus::Waiting,
        };
        self.rows
            .write()
            .map_err(|_| StoreError::Client("patient table lock poisoned".into()))?
            .push(row.clone());
        Ok(row)
    }

    fn all_rows(&self) -> Result<Vec<Patient>, StoreError> {
        self.rows
            .read()
            .map(|rows| rows.clone())
            .map_err(|_| StoreError::Client("patient table lock poisoned".into()))
    }

    fn find_row(&self, patient_id: Uuid) -> Result<Patient, StoreError> {
        self.all_rows()?
            .into_iter()
            .find(|p| p.patient_id == patient_id)
            .ok_or_else(|| StoreError::NotFound {
                entity_type: "patient".into(),
                id: patient_id.to_string(),
            })
    }
}

impl PatientStore for InMemoryPatientStore {
    fn insert(&self, patient: PatientCreate) -> BoxFuture<'_, Result<Patient, StoreError>> {
        future::ready(self.insert_row(patient)).boxed()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Patient>, StoreError>> {
        future::ready(self.all_rows()).boxed()
    }

    fn get(&self, patient_id: Uuid) -> BoxFuture<'_, Result<Patient, StoreError>> {
        future::ready(self.find_row(patient_id)).boxed()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
