//! HTTP API for patient intake and risk assessment.
//!
//! `api_router()` returns a composable `Router`; `start_api_server()` binds
//! it and runs it in the background until shut down.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::{api_router, with_cors};
pub use server::{start_api_server, ApiServer};
pub use types::{ApiContext, ValidatedJson};
