//! Patient repository: the `PatientStore` seam and its backends.

pub mod memory;
pub mod repository;
pub mod rest;

pub use memory::InMemoryPatientStore;
pub use repository::PatientStore;
pub use rest::{RestStoreConfig, RestTableStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot reach patient store at {0}")]
    Connection(String),

    #[error("Patient store request timed out after {0}s")]
    Timeout(u64),

    #[error("Patient store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected patient store response: {0}")]
    Decode(String),

    #[error("Patient store returned no rows for the insert")]
    EmptyResponse,

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}
