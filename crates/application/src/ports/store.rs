//! Configuration store port.
//!
//! Loads are lenient by contract: a missing or undecodable file yields the
//! empty default (implementations log the decode failure). Saves report
//! failure through `Result`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use beacon_domain::environment::EnvironmentRegistry;
use beacon_domain::history::CallHistory;
use beacon_domain::request::ApiDefinition;
use thiserror::Error;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a document failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Port for per-user and shared JSON configuration documents.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads a user's saved API definitions.
    async fn load_user_apis(&self, username: &str) -> BTreeMap<String, ApiDefinition>;

    /// Saves a user's API definitions.
    async fn save_user_apis(
        &self,
        username: &str,
        apis: &BTreeMap<String, ApiDefinition>,
    ) -> StoreResult<()>;

    /// Loads a user's call history.
    async fn load_history(&self, username: &str) -> CallHistory;

    /// Saves a user's call history.
    async fn save_history(&self, username: &str, history: &CallHistory) -> StoreResult<()>;

    /// Loads a user's per-environment cookie overrides.
    async fn load_user_cookies(&self, username: &str) -> BTreeMap<String, String>;

    /// Saves a user's per-environment cookie overrides.
    async fn save_user_cookies(
        &self,
        username: &str,
        cookies: &BTreeMap<String, String>,
    ) -> StoreResult<()>;

    /// Loads the admin's global cookie overrides.
    async fn load_admin_cookies(&self) -> BTreeMap<String, String>;

    /// Saves the admin's global cookie overrides.
    async fn save_admin_cookies(&self, cookies: &BTreeMap<String, String>) -> StoreResult<()>;

    /// Loads the shared predefined API templates.
    async fn load_templates(&self) -> BTreeMap<String, ApiDefinition>;

    /// Saves the shared predefined API templates.
    async fn save_templates(&self, templates: &BTreeMap<String, ApiDefinition>) -> StoreResult<()>;

    /// Loads the environment registry overrides.
    async fn load_environments(&self) -> EnvironmentRegistry;

    /// Saves the environment registry overrides.
    async fn save_environments(&self, registry: &EnvironmentRegistry) -> StoreResult<()>;

    /// Lists existing users (excluding the admin user).
    async fn list_users(&self) -> StoreResult<Vec<String>>;

    /// Creates the on-disk directory for a user if it does not exist.
    async fn ensure_user(&self, username: &str) -> StoreResult<()>;
}
