//! The fully resolved request handed to the HTTP client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::HttpMethod;

/// A request with every layer of configuration already applied: the
/// environment's base URL, the module suffix, resolved cookies, and the
/// definition's headers, params and body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Query parameters.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Cookie header value; empty means no Cookie header.
    #[serde(default)]
    pub cookie_string: String,
    /// JSON body, absent for GET.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl PreparedRequest {
    /// Creates a bare request for the given method and URL.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            cookie_string: String::new(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches query parameters.
    #[must_use]
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Attaches a cookie string.
    #[must_use]
    pub fn with_cookies(mut self, cookie_string: impl Into<String>) -> Self {
        self.cookie_string = cookie_string.into();
        self
    }
}
