//! Saved API definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cookie::{format_cookie_string, parse_cookie_string};
use crate::environment::Module;
use crate::error::{DomainError, DomainResult};
use crate::request::{HttpMethod, PreparedRequest};

/// A named, user-editable API call configuration.
///
/// Every optional field has a serde default so definitions persisted by
/// older versions of the tool (or hand-edited JSON) load without error;
/// shape problems surface as typed validation errors instead of panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiDefinition {
    /// Display name; unique within a user's collection.
    #[serde(default)]
    pub name: String,
    /// Endpoint path, always starting with `/`.
    #[serde(default)]
    pub path: String,
    /// HTTP method to issue.
    #[serde(default)]
    pub method: HttpMethod,
    /// Backend module the path belongs to.
    #[serde(default)]
    pub module: Module,
    /// Extra request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Query parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// JSON request body (sent for non-GET methods).
    #[serde(default)]
    pub body: Value,
    /// Cookies chosen for this call, if any.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Raw custom cookie string; wins over `cookies` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_cookies_string: Option<String>,
}

impl ApiDefinition {
    /// Creates a definition with the given name, path, method and module.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        method: HttpMethod,
        module: Module,
    ) -> Self {
        Self {
            name: name.into(),
            path: normalize_path(&path.into()),
            method,
            module,
            ..Self::default()
        }
    }

    /// Sets the endpoint path, normalizing the leading slash.
    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    /// Replaces the body from user-edited JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBody`] when the text is not valid
    /// JSON; the previous body is left untouched.
    pub fn set_body_json(&mut self, text: &str) -> DomainResult<()> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.body = value;
        Ok(())
    }

    /// The cookie string to attach to this call.
    ///
    /// A custom cookie string wins, then explicitly selected cookies, then
    /// whatever was resolved for the current environment.
    #[must_use]
    pub fn cookie_header(&self, env_cookie_string: &str) -> String {
        if let Some(custom) = &self.custom_cookies_string {
            return format_cookie_string(&parse_cookie_string(custom));
        }
        if !self.cookies.is_empty() {
            return format_cookie_string(&self.cookies);
        }
        format_cookie_string(&parse_cookie_string(env_cookie_string))
    }

    /// Builds the concrete request for a module-resolved base URL.
    #[must_use]
    pub fn prepare(&self, base_url: &str, env_cookie_string: &str) -> PreparedRequest {
        let base = base_url.trim_end_matches('/');
        PreparedRequest {
            method: self.method,
            url: format!("{base}{}", self.path),
            headers: self.headers.clone(),
            params: self.params.clone(),
            cookie_string: self.cookie_header(env_cookie_string),
            body: if self.method.has_body() && !self.body.is_null() {
                Some(self.body.clone())
            } else {
                None
            },
        }
    }
}

/// Ensures a path starts with a slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
