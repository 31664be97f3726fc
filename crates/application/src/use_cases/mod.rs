//! Use cases: single-call sending, the dual-call orchestration, and the
//! auto mark entry batch.

mod dual_call;
mod mark_entry;
mod send_request;

pub use dual_call::{
    DualCallInput, DualCallReport, DualCallRunner, StepResult, StudentSubjectRecord,
    ADD_STUDENTS_TO_COURSE_PATH, ADD_STUDENTS_TO_SUBJECT_PATH,
};
pub use mark_entry::{BatchItem, BatchSummary, MarkEntryBatch, MarkEntryRunner, AUTO_MARK_ENTRY_PATH};
pub use send_request::RequestSender;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use beacon_domain::outcome::{CallOutcome, ResponseBody};
    use beacon_domain::request::PreparedRequest;
    use serde_json::json;

    use crate::ports::HttpClient;

    /// A scripted HTTP client: answers each call with the next queued
    /// status (200 once the script runs out) and records every request.
    pub struct ScriptedClient {
        statuses: Mutex<VecDeque<u16>>,
        pub calls: Mutex<Vec<PreparedRequest>>,
    }

    impl ScriptedClient {
        pub fn new(statuses: impl IntoIterator<Item = u16>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn always_ok() -> Self {
            Self::new([])
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }

        pub fn recorded(&self) -> Vec<PreparedRequest> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn execute(&self, request: &PreparedRequest) -> CallOutcome {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(request.clone());
            }
            let status = self
                .statuses
                .lock()
                .ok()
                .and_then(|mut s| s.pop_front())
                .unwrap_or(200);
            CallOutcome::completed(
                request.method,
                request.url.clone(),
                status,
                BTreeMap::new(),
                ResponseBody::Json(json!({"echo": request.url})),
                7,
            )
        }
    }
}
