//! Single request sending.

use std::collections::BTreeMap;

use beacon_domain::cookie::resolve_cookie_string;
use beacon_domain::environment::EnvironmentRegistry;
use beacon_domain::history::HistoryEntry;
use beacon_domain::outcome::CallOutcome;
use beacon_domain::request::ApiDefinition;
use beacon_domain::DomainError;

use crate::ports::HttpClient;
use crate::ApplicationResult;

/// Builds and executes a single call from an API definition.
pub struct RequestSender<'a, C> {
    client: &'a C,
    registry: &'a EnvironmentRegistry,
}

impl<'a, C: HttpClient> RequestSender<'a, C> {
    /// Creates a sender over a client and the environment registry.
    #[must_use]
    pub const fn new(client: &'a C, registry: &'a EnvironmentRegistry) -> Self {
        Self { client, registry }
    }

    /// Sends the definition against `env_name`, resolving the base URL for
    /// the definition's module and the cookie string by precedence
    /// (user > admin > environment default > empty). Returns the outcome
    /// together with the history entry recording the call.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownEnvironment`] when the environment is
    /// not in the registry. Transport failures are not errors; they come
    /// back as status-0 outcomes.
    pub async fn send(
        &self,
        api: &ApiDefinition,
        env_name: &str,
        user_cookies: &BTreeMap<String, String>,
        admin_cookies: &BTreeMap<String, String>,
    ) -> ApplicationResult<(CallOutcome, HistoryEntry)> {
        let base_url = self
            .registry
            .resolve(env_name, api.module)
            .ok_or_else(|| DomainError::UnknownEnvironment(env_name.to_string()))?;

        let env_cookie_string =
            resolve_cookie_string(env_name, user_cookies, admin_cookies, self.registry);

        let prepared = api.prepare(&base_url, &env_cookie_string);
        log::debug!("dispatching {} {}", prepared.method, prepared.url);

        let outcome = self.client.execute(&prepared).await;
        let entry = HistoryEntry::record(api, env_name, &outcome);
        Ok((outcome, entry))
    }
}
