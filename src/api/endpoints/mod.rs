//! API endpoint handlers, one module per resource.

pub mod patients;
pub mod predict;
pub mod root;
