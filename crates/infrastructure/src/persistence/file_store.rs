//! File-backed configuration store.
//!
//! One JSON document per concern. Loads are lenient: a missing file is
//! normal (first run, new user) and an undecodable file is logged and
//! treated as empty rather than taking the session down. Saves create
//! missing directories and report real errors.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use beacon_application::ports::{ConfigStore, StoreError, StoreResult};
use beacon_domain::cookie::ADMIN_USERNAME;
use beacon_domain::environment::EnvironmentRegistry;
use beacon_domain::history::CallHistory;
use beacon_domain::request::ApiDefinition;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::persistence::DataRoot;
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Configuration store over JSON files under a data root.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    paths: DataRoot,
}

impl FileConfigStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(paths: DataRoot) -> Self {
        Self { paths }
    }

    /// The store's path layout.
    #[must_use]
    pub const fn paths(&self) -> &DataRoot {
        &self.paths
    }

    /// Loads a document, yielding the default for missing or broken files.
    async fn load_or_default<T>(path: &Path) -> T
    where
        T: DeserializeOwned + Default,
    {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                if error.kind() != ErrorKind::NotFound {
                    log::warn!("could not read {}: {error}", path.display());
                }
                return T::default();
            }
        };
        match from_json_bytes(&bytes) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("could not decode {}: {error}", path.display());
                T::default()
            }
        }
    }

    /// Writes a document, creating its parent directory first.
    async fn save<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = to_json_stable_bytes(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_user_apis(&self, username: &str) -> BTreeMap<String, ApiDefinition> {
        Self::load_or_default(&self.paths.user_apis(username)).await
    }

    async fn save_user_apis(
        &self,
        username: &str,
        apis: &BTreeMap<String, ApiDefinition>,
    ) -> StoreResult<()> {
        Self::save(&self.paths.user_apis(username), apis).await
    }

    async fn load_history(&self, username: &str) -> CallHistory {
        Self::load_or_default(&self.paths.user_history(username)).await
    }

    async fn save_history(&self, username: &str, history: &CallHistory) -> StoreResult<()> {
        Self::save(&self.paths.user_history(username), history).await
    }

    async fn load_user_cookies(&self, username: &str) -> BTreeMap<String, String> {
        Self::load_or_default(&self.paths.user_cookies(username)).await
    }

    async fn save_user_cookies(
        &self,
        username: &str,
        cookies: &BTreeMap<String, String>,
    ) -> StoreResult<()> {
        Self::save(&self.paths.user_cookies(username), cookies).await
    }

    async fn load_admin_cookies(&self) -> BTreeMap<String, String> {
        Self::load_or_default(&self.paths.admin_cookies()).await
    }

    async fn save_admin_cookies(&self, cookies: &BTreeMap<String, String>) -> StoreResult<()> {
        Self::save(&self.paths.admin_cookies(), cookies).await
    }

    async fn load_templates(&self) -> BTreeMap<String, ApiDefinition> {
        Self::load_or_default(&self.paths.templates()).await
    }

    async fn save_templates(&self, templates: &BTreeMap<String, ApiDefinition>) -> StoreResult<()> {
        Self::save(&self.paths.templates(), templates).await
    }

    async fn load_environments(&self) -> EnvironmentRegistry {
        Self::load_or_default(&self.paths.environments()).await
    }

    async fn save_environments(&self, registry: &EnvironmentRegistry) -> StoreResult<()> {
        Self::save(&self.paths.environments(), registry).await
    }

    async fn list_users(&self) -> StoreResult<Vec<String>> {
        let dir = self.paths.user_data_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                if name != ADMIN_USERNAME {
                    users.push(name);
                }
            }
        }
        users.sort();
        Ok(users)
    }

    async fn ensure_user(&self, username: &str) -> StoreResult<()> {
        fs::create_dir_all(self.paths.user_dir(username)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use beacon_domain::environment::{EnvironmentEntry, Module};
    use beacon_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> FileConfigStore {
        FileConfigStore::new(DataRoot::new(dir.path()))
    }

    #[tokio::test]
    async fn test_apis_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let mut apis = BTreeMap::new();
        apis.insert(
            "Ping".to_string(),
            ApiDefinition::new("Ping", "/health", HttpMethod::Get, Module::Ex),
        );
        store.save_user_apis("alice", &apis).await.unwrap();

        let loaded = store.load_user_apis("alice").await;
        assert_eq!(loaded, apis);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        assert!(store.load_user_apis("ghost").await.is_empty());
        assert_eq!(store.load_history("ghost").await.len(), 0);
        assert!(store.load_admin_cookies().await.is_empty());
    }

    #[tokio::test]
    async fn test_broken_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let path = store.paths().user_apis("alice");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json at all").unwrap();

        assert!(store.load_user_apis("alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_list_users_excludes_admin() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.ensure_user("bob").await.unwrap();
        store.ensure_user("alice").await.unwrap();
        store.ensure_user(ADMIN_USERNAME).await.unwrap();

        assert_eq!(store.list_users().await.unwrap(), vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_environment_overrides_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let mut registry = EnvironmentRegistry::new();
        registry.upsert(EnvironmentEntry {
            name: "SIT".to_string(),
            base_url: "https://sit.replacement.internal".to_string(),
            default_cookies: "token=t".to_string(),
            enabled: true,
        });
        store.save_environments(&registry).await.unwrap();

        let loaded = store.load_environments().await;
        assert_eq!(
            loaded.get("SIT").map(|e| e.base_url).as_deref(),
            Some("https://sit.replacement.internal")
        );
    }

    #[tokio::test]
    async fn test_cookies_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        let mut cookies = BTreeMap::new();
        cookies.insert("DAI".to_string(), "session=abc".to_string());
        store.save_user_cookies("alice", &cookies).await.unwrap();

        assert_eq!(store.load_user_cookies("alice").await, cookies);
    }
}
