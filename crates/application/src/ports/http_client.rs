//! HTTP client port.

use async_trait::async_trait;
use beacon_domain::outcome::CallOutcome;
use beacon_domain::request::PreparedRequest;

/// Port for executing HTTP requests.
///
/// Implementations convert transport failures into status-0
/// [`CallOutcome`]s rather than returning errors; by the time a call
/// reaches this boundary there is nothing left to fail structurally.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a prepared request and returns the normalized outcome.
    async fn execute(&self, request: &PreparedRequest) -> CallOutcome;
}
