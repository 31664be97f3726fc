//! HTTP client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It never returns an
//! error: transport failures are folded into status-0 outcomes so callers
//! see every call, failed or not, through the same shape.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use beacon_application::ports::HttpClient;
use beacon_domain::outcome::{CallOutcome, FailureKind, ResponseBody};
use beacon_domain::request::{HttpMethod, PreparedRequest};
use reqwest::header::COOKIE;
use reqwest::{Client, Method};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client implementation wrapping `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings: 30 second
    /// timeout, up to 10 redirects, TLS verification enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("Beacon/0.1.0")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Creates a client over a custom `reqwest::Client`.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Converts the domain method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }

    /// Classifies a reqwest error into a failure kind.
    fn classify(error: &reqwest::Error) -> FailureKind {
        if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connection
        } else {
            FailureKind::Transport
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &PreparedRequest) -> CallOutcome {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &request.url)
            .timeout(self.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if !request.cookie_string.is_empty() {
            builder = builder.header(COOKIE, &request.cookie_string);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("request to {} failed: {error}", request.url);
                return CallOutcome::failed(
                    request.method,
                    request.url.clone(),
                    Self::classify(&error),
                    error.to_string(),
                );
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let text = match response.text().await {
            Ok(text) => text,
            Err(error) => {
                return CallOutcome::failed(
                    request.method,
                    final_url,
                    FailureKind::Transport,
                    format!("failed to read body: {error}"),
                );
            }
        };
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        CallOutcome::completed(
            request.method,
            final_url,
            status,
            headers,
            ResponseBody::from_text(&text),
            elapsed,
        )
    }
}
