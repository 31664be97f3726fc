//! Domain types for Beacon, an internal multi-user HTTP API testing tool.
//!
//! This crate contains pure types and logic with no I/O:
//! API definitions, the environment/module registry, cookie string
//! handling, call history, session state, and the spreadsheet row
//! mapping used to build request bodies.

pub mod cookie;
pub mod environment;
pub mod error;
pub mod history;
pub mod mapping;
pub mod outcome;
pub mod request;
pub mod session;

pub use error::{DomainError, DomainResult};
