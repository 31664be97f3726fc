//! Infrastructure adapters for Beacon.
//!
//! Implements the application ports: a reqwest-backed HTTP client and a
//! JSON-file configuration store.

pub mod http;
pub mod persistence;
pub mod serialization;

pub use http::ReqwestHttpClient;
pub use persistence::{DataRoot, FileConfigStore};
