//! HTTP middleware applied around the whole router.

pub mod access_log;
