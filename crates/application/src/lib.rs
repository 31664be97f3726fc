//! Application layer for Beacon.
//!
//! Use cases over two ports: an HTTP client and a configuration store.
//! This layer owns request construction, the dual-call orchestration, the
//! auto mark entry batch, and multi-user session handling.

pub mod error;
pub mod ports;
pub mod session_service;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
