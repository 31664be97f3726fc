//! Multi-user session orchestration.
//!
//! Owns the [`SessionManager`] and wires it to the configuration store:
//! logging a user in loads their saved APIs, history and cookie overrides;
//! switching away persists the outgoing user's collection; sending a call
//! records and persists history for the active user.

use std::collections::BTreeMap;

use beacon_domain::cookie::ADMIN_USERNAME;
use beacon_domain::environment::{EnvironmentEntry, EnvironmentRegistry};
use beacon_domain::outcome::CallOutcome;
use beacon_domain::request::ApiDefinition;
use beacon_domain::session::{validate_username, SessionManager, UserState};
use beacon_domain::DomainError;

use crate::ports::{ConfigStore, HttpClient};
use crate::use_cases::RequestSender;
use crate::{ApplicationError, ApplicationResult};

/// Session service over a store and an HTTP client.
pub struct SessionService<S, C> {
    store: S,
    client: C,
    sessions: SessionManager,
    registry: EnvironmentRegistry,
}

impl<S: ConfigStore, C: HttpClient> SessionService<S, C> {
    /// Creates the service, loading the environment registry overrides.
    pub async fn new(store: S, client: C) -> Self {
        let registry = store.load_environments().await;
        Self {
            store,
            client,
            sessions: SessionManager::new(),
            registry,
        }
    }

    /// The merged environment registry.
    #[must_use]
    pub const fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// The active user's state, if any.
    #[must_use]
    pub fn active(&self) -> Option<&UserState> {
        self.sessions.active()
    }

    /// Existing users on disk, excluding the admin.
    ///
    /// # Errors
    ///
    /// Returns a store error if the user directory cannot be read.
    pub async fn existing_users(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.store.list_users().await?)
    }

    /// Logs in an existing user (or the admin) and makes them active.
    ///
    /// # Errors
    ///
    /// Returns a store error if the user directory cannot be created.
    pub async fn login(&mut self, username: &str) -> ApplicationResult<()> {
        self.store.ensure_user(username).await?;

        let mut state = UserState::new(username);
        state.apis = self.store.load_user_apis(username).await;
        state.history = self.store.load_history(username).await;
        state.cookies = self.store.load_user_cookies(username).await;
        self.sessions.login(state);
        log::info!("user {username} logged in");
        Ok(())
    }

    /// Validates and creates a new user, then logs them in.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUsername`] for the reserved admin
    /// name, duplicates, or non-alphanumeric names.
    pub async fn create_user(&mut self, username: &str) -> ApplicationResult<()> {
        let existing = self.store.list_users().await?;
        validate_username(username, &existing)?;
        self.login(username).await
    }

    /// Switches the active user, persisting the outgoing user's APIs.
    /// Users not yet logged in within this process are logged in.
    ///
    /// # Errors
    ///
    /// Returns a store error if persisting either side fails.
    pub async fn switch_user(&mut self, username: &str) -> ApplicationResult<()> {
        self.persist_active_apis().await?;
        if self.sessions.is_logged_in(username) {
            self.sessions.switch_to(username)?;
            Ok(())
        } else {
            self.login(username).await
        }
    }

    /// Logs a user out, persisting their APIs first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the save fails.
    pub async fn logout(&mut self, username: &str) -> ApplicationResult<()> {
        if let Some(state) = self.sessions.get(username) {
            self.store.save_user_apis(username, &state.apis).await?;
        }
        self.sessions.logout(username);
        Ok(())
    }

    /// Selects the active user's environment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownEnvironment`] for names the registry
    /// does not know, or [`ApplicationError::NoActiveUser`].
    pub fn set_environment(&mut self, env_name: &str) -> ApplicationResult<()> {
        if self.registry.get(env_name).is_none() {
            return Err(DomainError::UnknownEnvironment(env_name.to_string()).into());
        }
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.current_env = env_name.to_string();
        Ok(())
    }

    /// Adds a definition to the active user's collection and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateName`] for name collisions.
    pub async fn add_api(&mut self, api: ApiDefinition) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.add_api(api)?;
        self.persist_active_apis().await
    }

    /// Renames a definition and persists the collection.
    ///
    /// # Errors
    ///
    /// Propagates the domain rename errors.
    pub async fn rename_api(&mut self, old: &str, new: &str) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.rename_api(old, new)?;
        self.persist_active_apis().await
    }

    /// Deletes a definition and persists the collection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] for unknown names.
    pub async fn remove_api(&mut self, name: &str) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.remove_api(name)?;
        self.persist_active_apis().await
    }

    /// Replaces a definition's body from user-edited JSON text without
    /// persisting; invalid JSON leaves the stored body untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] for undecodable text.
    pub fn edit_api_body(&mut self, name: &str, body_text: &str) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        let api = state
            .apis
            .get_mut(name)
            .ok_or_else(|| DomainError::ApiNotFound(name.to_string()))?;
        api.set_body_json(body_text)?;
        Ok(())
    }

    /// Saves the active user's cookie string for an environment.
    ///
    /// # Errors
    ///
    /// Returns a store error if the save fails.
    pub async fn save_cookies(&mut self, env_name: &str, cookies: &str) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state
            .cookies
            .insert(env_name.to_string(), cookies.to_string());
        let (username, cookies) = (state.username.clone(), state.cookies.clone());
        self.store.save_user_cookies(&username, &cookies).await?;
        Ok(())
    }

    /// Saves a global cookie override. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::AdminRequired`] for non-admin users.
    pub async fn save_admin_cookies(
        &mut self,
        env_name: &str,
        cookies: &str,
    ) -> ApplicationResult<()> {
        self.require_admin()?;
        let mut admin_cookies = self.store.load_admin_cookies().await;
        admin_cookies.insert(env_name.to_string(), cookies.to_string());
        self.store.save_admin_cookies(&admin_cookies).await?;
        Ok(())
    }

    /// Adds or replaces an environment registry entry and persists the
    /// overrides. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::AdminRequired`] for non-admin users.
    pub async fn upsert_environment(&mut self, entry: EnvironmentEntry) -> ApplicationResult<()> {
        self.require_admin()?;
        self.registry.upsert(entry);
        self.store.save_environments(&self.registry).await?;
        Ok(())
    }

    /// Copies a definition into the shared predefined templates, stripping
    /// environment-specific cookie state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] for unknown names.
    pub async fn save_template(&mut self, api_name: &str) -> ApplicationResult<()> {
        let state = self.sessions.active().ok_or(ApplicationError::NoActiveUser)?;
        let mut api = state
            .apis
            .get(api_name)
            .cloned()
            .ok_or_else(|| DomainError::ApiNotFound(api_name.to_string()))?;
        api.cookies.clear();
        api.custom_cookies_string = None;

        let mut templates = self.store.load_templates().await;
        templates.insert(api.name.clone(), api);
        self.store.save_templates(&templates).await?;
        Ok(())
    }

    /// Loads a predefined template into the active user's collection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] if no template has that name
    /// and [`DomainError::DuplicateName`] on collision.
    pub async fn load_template(&mut self, template_name: &str) -> ApplicationResult<()> {
        let templates = self.store.load_templates().await;
        let api = templates
            .get(template_name)
            .cloned()
            .ok_or_else(|| DomainError::ApiNotFound(template_name.to_string()))?;
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.add_api(api)?;
        Ok(())
    }

    /// Sends a saved definition for the active user against their current
    /// environment, recording the outcome in responses and history.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] for unknown names; transport
    /// failures come back as status-0 outcomes, not errors.
    pub async fn send(&mut self, api_name: &str) -> ApplicationResult<CallOutcome> {
        let admin_cookies = self.store.load_admin_cookies().await;

        let state = self.sessions.active().ok_or(ApplicationError::NoActiveUser)?;
        let api = state
            .apis
            .get(api_name)
            .cloned()
            .ok_or_else(|| DomainError::ApiNotFound(api_name.to_string()))?;
        let env_name = state.current_env.clone();
        let user_cookies = state.cookies.clone();
        let username = state.username.clone();

        let sender = RequestSender::new(&self.client, &self.registry);
        let (outcome, entry) = sender
            .send(&api, &env_name, &user_cookies, &admin_cookies)
            .await?;

        if let Some(state) = self.sessions.active_mut() {
            state.responses.insert(api_name.to_string(), outcome.clone());
            state.history.push(entry);
            let history = state.history.clone();
            self.store.save_history(&username, &history).await?;
        }
        Ok(outcome)
    }

    /// Clears the active user's history and persists the empty list.
    ///
    /// # Errors
    ///
    /// Returns a store error if the save fails.
    pub async fn clear_history(&mut self) -> ApplicationResult<()> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        state.history.clear();
        let (username, history) = (state.username.clone(), state.history.clone());
        self.store.save_history(&username, &history).await?;
        Ok(())
    }

    /// Reloads a history entry's configuration as a new definition named
    /// `<name> (from history)`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ApiNotFound`] for an out-of-range index.
    pub fn load_from_history(&mut self, index: usize) -> ApplicationResult<String> {
        let state = self.sessions.active_mut().ok_or(ApplicationError::NoActiveUser)?;
        let entry = state
            .history
            .get(index)
            .ok_or_else(|| DomainError::ApiNotFound(format!("history entry {index}")))?;
        let mut api = entry.config.clone();
        let name = format!("{} (from history)", entry.name);
        api.name.clone_from(&name);
        // Replacing an earlier reload of the same entry is fine.
        state.apis.insert(name.clone(), api);
        Ok(name)
    }

    async fn persist_active_apis(&mut self) -> ApplicationResult<()> {
        if let Some(state) = self.sessions.active() {
            self.store
                .save_user_apis(&state.username, &state.apis)
                .await?;
        }
        Ok(())
    }

    fn require_admin(&self) -> ApplicationResult<()> {
        let is_admin = self
            .sessions
            .active()
            .is_some_and(|s| s.is_admin && s.username == ADMIN_USERNAME);
        if is_admin {
            Ok(())
        } else {
            Err(ApplicationError::AdminRequired)
        }
    }
}

impl<S: ConfigStore, C: HttpClient> SessionService<S, C> {
    /// Access to the store for callers that need raw documents.
    pub const fn store(&self) -> &S {
        &self.store
    }
}
