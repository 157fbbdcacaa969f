use futures_util::future::BoxFuture;
use uuid::Uuid;

use super::StoreError;
use crate::models::{Patient, PatientCreate};

/// Patient table operations.
///
/// Futures are boxed so handlers can hold the store as `Arc<dyn PatientStore>`.
/// Implementations never retry; every failure reaches the caller unchanged.
pub trait PatientStore: Send + Sync {
    /// Insert one row and return it with the store-assigned id and timestamp.
    fn insert(&self, patient: PatientCreate) -> BoxFuture<'_, Result<Patient, StoreError>>;

    /// All rows, in the order the store returns them.
    fn list(&self) -> BoxFuture<'_, Result<Vec<Patient>, StoreError>>;

    fn get(&self, patient_id: Uuid) -> BoxFuture<'_, Result<Patient, StoreError>>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}
