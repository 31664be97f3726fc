//! Ports implemented by the infrastructure layer.

mod http_client;
mod store;

pub use http_client::HttpClient;
pub use store::{ConfigStore, StoreError, StoreResult};
