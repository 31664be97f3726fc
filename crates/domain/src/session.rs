//! Multi-user session state.
//!
//! Several users can be "logged in" within one process; exactly one is
//! active at a time and owns the visible API collection, responses,
//! history and cookie overrides. Session state is an explicit object
//! passed to operations, not ambient globals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cookie::ADMIN_USERNAME;
use crate::error::{DomainError, DomainResult};
use crate::history::CallHistory;
use crate::outcome::CallOutcome;
use crate::request::ApiDefinition;

/// Per-user in-memory state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserState {
    /// Username this state belongs to.
    pub username: String,
    /// True only for the reserved admin user.
    pub is_admin: bool,
    /// Saved API definitions keyed by name.
    #[serde(default)]
    pub apis: BTreeMap<String, ApiDefinition>,
    /// Last response per API name.
    #[serde(default)]
    pub responses: BTreeMap<String, CallOutcome>,
    /// Currently selected environment.
    #[serde(default = "default_env")]
    pub current_env: String,
    /// Rolling call history.
    #[serde(default)]
    pub history: CallHistory,
    /// Per-environment cookie string overrides.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

fn default_env() -> String {
    "SIT".to_string()
}

impl UserState {
    /// Creates a fresh state for a user.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            is_admin: username == ADMIN_USERNAME,
            username,
            current_env: default_env(),
            ..Self::default()
        }
    }

    /// Adds a definition, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateName`] if the name is taken.
    pub fn add_api(&mut self, api: ApiDefinition) -> DomainResult<()> {
        if self.apis.contains_key(&api.name) {
            return Err(DomainError::DuplicateName(api.name));
        }
        self.apis.insert(api.name.clone(), api);
        Ok(())
    }

    /// Renames a definition, carrying its last response along.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] if `old` does not exist and
    /// [`DomainError::DuplicateName`] if `new` is already taken.
    pub fn rename_api(&mut self, old: &str, new: &str) -> DomainResult<()> {
        if old == new {
            return Ok(());
        }
        if self.apis.contains_key(new) {
            return Err(DomainError::DuplicateName(new.to_string()));
        }
        let Some(mut api) = self.apis.remove(old) else {
            return Err(DomainError::ApiNotFound(old.to_string()));
        };
        api.name = new.to_string();
        self.apis.insert(new.to_string(), api);
        if let Some(response) = self.responses.remove(old) {
            self.responses.insert(new.to_string(), response);
        }
        Ok(())
    }

    /// Removes a definition and its last response.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] if the name does not exist.
    pub fn remove_api(&mut self, name: &str) -> DomainResult<ApiDefinition> {
        self.responses.remove(name);
        self.apis
            .remove(name)
            .ok_or_else(|| DomainError::ApiNotFound(name.to_string()))
    }
}

/// Tracks which users are logged in and which one is active.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    users: BTreeMap<String, UserState>,
    active: Option<String>,
}

impl SessionManager {
    /// Creates an empty session manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a user in (replacing any previous state for the name) and
    /// makes them active.
    pub fn login(&mut self, state: UserState) {
        self.active = Some(state.username.clone());
        self.users.insert(state.username.clone(), state);
    }

    /// Switches the active user to an already logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UserNotLoggedIn`] if the name is unknown.
    pub fn switch_to(&mut self, username: &str) -> DomainResult<()> {
        if !self.users.contains_key(username) {
            return Err(DomainError::UserNotLoggedIn(username.to_string()));
        }
        self.active = Some(username.to_string());
        Ok(())
    }

    /// Removes a user's state, deactivating them if they were active.
    /// Returns the removed state so callers can persist it.
    pub fn logout(&mut self, username: &str) -> Option<UserState> {
        if self.active.as_deref() == Some(username) {
            self.active = None;
        }
        self.users.remove(username)
    }

    /// The active user's state.
    #[must_use]
    pub fn active(&self) -> Option<&UserState> {
        self.active.as_ref().and_then(|name| self.users.get(name))
    }

    /// Mutable access to the active user's state.
    pub fn active_mut(&mut self) -> Option<&mut UserState> {
        let name = self.active.clone()?;
        self.users.get_mut(&name)
    }

    /// State for a specific logged-in user.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&UserState> {
        self.users.get(username)
    }

    /// Names of all logged-in users.
    #[must_use]
    pub fn logged_in(&self) -> Vec<&str> {
        self.users.keys().map(String::as_str).collect()
    }

    /// True if the given user is logged in.
    #[must_use]
    pub fn is_logged_in(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }
}

/// Validates a username for account creation.
///
/// The reserved admin name cannot be created, existing names are rejected,
/// and names must be non-empty and alphanumeric.
///
/// # Errors
///
/// Returns [`DomainError::InvalidUsername`] describing the violation.
pub fn validate_username(username: &str, existing: &[String]) -> DomainResult<()> {
    if username == ADMIN_USERNAME {
        return Err(DomainError::InvalidUsername(
            "cannot create user with the admin username".to_string(),
        ));
    }
    if existing.iter().any(|u| u == username) {
        return Err(DomainError::InvalidUsername(
            "username already exists".to_string(),
        ));
    }
    if username.is_empty() || !username.chars().all(char::is_alphanumeric) {
        return Err(DomainError::InvalidUsername(
            "username must contain only letters and numbers".to_string(),
        ));
    }
    Ok(())
}
