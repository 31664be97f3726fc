//! Auto mark entry batch.
//!
//! Issues one POST per subject code, sequentially, with a fixed small
//! delay between calls. Individual failures never abort the loop; the
//! summary reports per-item status and the final tallies.

use std::collections::BTreeMap;
use std::time::Duration;

use beacon_domain::cookie::resolve_cookie_string;
use beacon_domain::environment::{EnvironmentRegistry, Module};
use beacon_domain::request::{HttpMethod, PreparedRequest};
use beacon_domain::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ports::HttpClient;
use crate::ApplicationResult;

/// Endpoint for generating mark entries.
pub const AUTO_MARK_ENTRY_PATH: &str = "/assessmentmarkentry/autocreate";

/// Pause between consecutive calls.
const CALL_DELAY: Duration = Duration::from_millis(300);

/// Input for the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntryBatch {
    /// Semester the marks belong to.
    pub semester_id: String,
    /// Subject codes to process, one call each.
    pub subject_codes: Vec<String>,
    /// Students to generate marks for.
    pub student_ids: Vec<String>,
}

/// Per-subject result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Subject code this call covered.
    pub subject_code: String,
    /// Response status (0 for transport failures).
    pub status: u16,
    /// True for 2xx.
    pub success: bool,
}

/// Final batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    /// Number of subject codes processed.
    pub total: usize,
    /// Calls that returned 2xx.
    pub succeeded: usize,
    /// Calls that did not.
    pub failed: usize,
    /// Per-item results in call order.
    pub items: Vec<BatchItem>,
}

/// Runs the sequential mark entry batch.
pub struct MarkEntryRunner<'a, C> {
    client: &'a C,
    registry: &'a EnvironmentRegistry,
    delay: Duration,
}

impl<'a, C: HttpClient> MarkEntryRunner<'a, C> {
    /// Creates a runner with the standard inter-call delay.
    #[must_use]
    pub const fn new(client: &'a C, registry: &'a EnvironmentRegistry) -> Self {
        Self {
            client,
            registry,
            delay: CALL_DELAY,
        }
    }

    /// Overrides the inter-call delay (tests use zero).
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Processes every subject code and returns the summary. The loop
    /// continues through individual failures.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownEnvironment`] when the environment is
    /// not in the registry.
    pub async fn run(
        &self,
        env_name: &str,
        user_cookies: &BTreeMap<String, String>,
        admin_cookies: &BTreeMap<String, String>,
        batch: &MarkEntryBatch,
    ) -> ApplicationResult<BatchSummary> {
        let base_url = self
            .registry
            .resolve(env_name, Module::Ex)
            .ok_or_else(|| DomainError::UnknownEnvironment(env_name.to_string()))?;
        let cookie_string =
            resolve_cookie_string(env_name, user_cookies, admin_cookies, self.registry);

        let mut summary = BatchSummary {
            total: batch.subject_codes.len(),
            ..BatchSummary::default()
        };

        for (i, subject_code) in batch.subject_codes.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let request = PreparedRequest::new(
                HttpMethod::Post,
                format!("{base_url}{AUTO_MARK_ENTRY_PATH}"),
            )
            .with_cookies(cookie_string.clone())
            .with_body(json!({
                "semesterId": batch.semester_id,
                "subjectCode": subject_code,
                "studentIds": batch.student_ids,
            }));

            let outcome = self.client.execute(&request).await;
            if outcome.success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
                log::warn!("mark entry failed for subject {subject_code}: {}", outcome.status);
            }
            summary.items.push(BatchItem {
                subject_code: subject_code.clone(),
                status: outcome.status,
                success: outcome.success,
            });
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedClient;
    use pretty_assertions::assert_eq;

    fn batch() -> MarkEntryBatch {
        MarkEntryBatch {
            semester_id: "sem-1".to_string(),
            subject_codes: vec!["DEV7".to_string(), "DEV70529".to_string(), "DEV7DAILY".to_string()],
            student_ids: vec!["s1".to_string(), "s2".to_string()],
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_loop() {
        let client = ScriptedClient::new([200, 500, 200]);
        let registry = EnvironmentRegistry::new();
        let runner = MarkEntryRunner::new(&client, &registry).with_delay(Duration::ZERO);

        let summary = runner
            .run("DAI", &BTreeMap::new(), &BTreeMap::new(), &batch())
            .await
            .unwrap();

        assert_eq!(client.call_count(), 3);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.items[1].status, 500);
        assert!(!summary.items[1].success);
    }

    #[tokio::test]
    async fn test_each_call_targets_one_subject() {
        let client = ScriptedClient::always_ok();
        let registry = EnvironmentRegistry::new();
        let runner = MarkEntryRunner::new(&client, &registry).with_delay(Duration::ZERO);

        runner
            .run("DAI", &BTreeMap::new(), &BTreeMap::new(), &batch())
            .await
            .unwrap();

        let calls = client.recorded();
        assert_eq!(calls.len(), 3);
        for (call, code) in calls.iter().zip(["DEV7", "DEV70529", "DEV7DAILY"]) {
            assert!(call.url.ends_with(AUTO_MARK_ENTRY_PATH));
            let body = call.body.as_ref().unwrap();
            assert_eq!(body["subjectCode"], serde_json::json!(code));
            assert_eq!(body["studentIds"], serde_json::json!(["s1", "s2"]));
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let client = ScriptedClient::always_ok();
        let registry = EnvironmentRegistry::new();
        let runner = MarkEntryRunner::new(&client, &registry).with_delay(Duration::ZERO);

        let summary = runner
            .run(
                "DAI",
                &BTreeMap::new(),
                &BTreeMap::new(),
                &MarkEntryBatch {
                    semester_id: "sem-1".to_string(),
                    subject_codes: vec![],
                    student_ids: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(client.call_count(), 0);
        assert_eq!(summary.total, 0);
    }
}
