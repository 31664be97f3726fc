//! On-disk layout of the configuration store.
//!
//! Everything lives under one data root:
//!
//! ```text
//! <root>/
//!   api_configs.json             shared predefined templates
//!   environments_config.json     environment registry overrides
//!   admin_cookies_config.json    admin cookie overrides
//!   user_data/
//!     <username>/
//!       user_apis.json           the user's API collection
//!       api_history.json         rolling call history
//!       cookies_config.json      per-environment cookie strings
//! ```

use std::path::{Path, PathBuf};

/// Resolves document paths under a data root directory.
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    /// Creates a data root at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all per-user data.
    #[must_use]
    pub fn user_data_dir(&self) -> PathBuf {
        self.root.join("user_data")
    }

    /// A user's own directory.
    #[must_use]
    pub fn user_dir(&self, username: &str) -> PathBuf {
        self.user_data_dir().join(username)
    }

    /// A user's API collection document.
    #[must_use]
    pub fn user_apis(&self, username: &str) -> PathBuf {
        self.user_dir(username).join("user_apis.json")
    }

    /// A user's call history document.
    #[must_use]
    pub fn user_history(&self, username: &str) -> PathBuf {
        self.user_dir(username).join("api_history.json")
    }

    /// A user's cookie overrides document.
    #[must_use]
    pub fn user_cookies(&self, username: &str) -> PathBuf {
        self.user_dir(username).join("cookies_config.json")
    }

    /// The shared predefined templates document.
    #[must_use]
    pub fn templates(&self) -> PathBuf {
        self.root.join("api_configs.json")
    }

    /// The environment registry overrides document.
    #[must_use]
    pub fn environments(&self) -> PathBuf {
        self.root.join("environments_config.json")
    }

    /// The admin cookie overrides document.
    #[must_use]
    pub fn admin_cookies(&self) -> PathBuf {
        self.root.join("admin_cookies_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let root = DataRoot::new("/tmp/beacon");
        assert!(root.user_apis("alice").ends_with("user_data/alice/user_apis.json"));
        assert!(root.user_history("alice").ends_with("user_data/alice/api_history.json"));
        assert!(root.user_cookies("alice").ends_with("user_data/alice/cookies_config.json"));
        assert!(root.templates().ends_with("api_configs.json"));
        assert!(root.environments().ends_with("environments_config.json"));
        assert!(root.admin_cookies().ends_with("admin_cookies_config.json"));
    }
}
