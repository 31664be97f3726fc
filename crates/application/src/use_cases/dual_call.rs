//! Dual-call orchestration.
//!
//! One predefined API fires two dependent calls instead of one: students
//! are first enrolled into their courses (one call per distinct course
//! code), and only if every course call succeeds is the full
//! student-subject list pushed in a single second call. Any failure in the
//! first phase aborts the sequence; the second endpoint is never invoked
//! after a phase-one failure.

use beacon_domain::cookie::resolve_cookie_string;
use beacon_domain::environment::{EnvironmentRegistry, Module};
use beacon_domain::mapping::{Assignment, RowMapping, Sheet};
use beacon_domain::outcome::{CallOutcome, ResponseBody};
use beacon_domain::request::{HttpMethod, PreparedRequest};
use beacon_domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::ports::HttpClient;
use crate::ApplicationResult;

/// Phase-one endpoint: add students to a course.
pub const ADD_STUDENTS_TO_COURSE_PATH: &str = "/studentcourse/addstudents";
/// Phase-two endpoint: add students to their subjects.
pub const ADD_STUDENTS_TO_SUBJECT_PATH: &str = "/studentsubject/addstudents";

/// One row of the enrolment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubjectRecord {
    /// Course the student belongs to.
    pub course_code: String,
    /// Student identifier.
    pub student_id: String,
    /// Subject identifier.
    pub subject_id: String,
}

/// Input for the dual call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualCallInput {
    /// Semester the enrolment applies to.
    pub semester_id: String,
    /// Student/course/subject rows; duplicates are tolerated.
    pub records: Vec<StudentSubjectRecord>,
}

impl DualCallInput {
    /// Builds the input from uploaded tabular rows carrying `Course Code`,
    /// `Student ID` and `Subject ID` columns (header match is
    /// case-insensitive; blank rows are skipped).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownColumn`] when a required column is
    /// missing from the sheet.
    pub fn from_sheet(semester_id: impl Into<String>, sheet: &Sheet) -> DomainResult<Self> {
        let mapping = RowMapping::Rows {
            assignments: vec![
                Assignment::new("Course Code", "courseCode"),
                Assignment::new("Student ID", "studentId"),
                Assignment::new("Subject ID", "subjectId"),
            ],
        };
        let rows = mapping.apply(sheet)?;
        let records = serde_json::from_value(rows)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        Ok(Self {
            semester_id: semester_id.into(),
            records,
        })
    }
}

/// Outcome of one phase-one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Course code this call enrolled students into.
    pub course_code: String,
    /// Normalized call outcome.
    pub outcome: CallOutcome,
}

/// Full report of a dual-call run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualCallReport {
    /// Phase-one calls in the order they were issued.
    pub course_steps: Vec<StepResult>,
    /// Phase-two call; absent when phase one aborted.
    pub subject_step: Option<CallOutcome>,
    /// True when every issued call returned 2xx.
    pub success: bool,
}

impl DualCallReport {
    /// Sum of all issued calls' elapsed times.
    #[must_use]
    pub fn total_time_ms(&self) -> u64 {
        let course: u64 = self.course_steps.iter().map(|s| s.outcome.time_ms).sum();
        course + self.subject_step.as_ref().map_or(0, |o| o.time_ms)
    }

    /// The first failing outcome, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&CallOutcome> {
        self.course_steps
            .iter()
            .map(|s| &s.outcome)
            .chain(self.subject_step.iter())
            .find(|o| !o.success)
    }

    /// A synthetic record aggregating both phases' timings and bodies,
    /// suitable for the response panel and history.
    #[must_use]
    pub fn combined(&self) -> CallOutcome {
        if let Some(failed) = self.failure() {
            return failed.clone();
        }
        let bodies: Vec<_> = self
            .course_steps
            .iter()
            .map(|s| {
                json!({
                    "courseCode": s.course_code,
                    "status": s.outcome.status,
                    "data": s.outcome.summary()["data"],
                })
            })
            .collect();
        let subject_body = self.subject_step.as_ref().map(|o| o.summary()["data"].clone());
        let url = self
            .subject_step
            .as_ref()
            .map_or_else(String::new, |o| o.url.clone());
        CallOutcome::completed(
            HttpMethod::Post,
            url,
            200,
            BTreeMap::new(),
            ResponseBody::Json(json!({
                "courses": bodies,
                "subject": subject_body,
            })),
            self.total_time_ms(),
        )
    }
}

/// Runs the two-phase enrolment sequence.
pub struct DualCallRunner<'a, C> {
    client: &'a C,
    registry: &'a EnvironmentRegistry,
}

impl<'a, C: HttpClient> DualCallRunner<'a, C> {
    /// Creates a runner over a client and the environment registry.
    #[must_use]
    pub const fn new(client: &'a C, registry: &'a EnvironmentRegistry) -> Self {
        Self { client, registry }
    }

    /// Executes the sequence against `env_name` on the administration
    /// module. Aborts after the first non-2xx phase-one response; the
    /// failing step's status and body are surfaced verbatim in the report.
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
        input: &DualCallInput,
    ) -> ApplicationResult<DualCallReport> {
        let base_url = self
            .registry
            .resolve(env_name, Module::Ad)
            .ok_or_else(|| DomainError::UnknownEnvironment(env_name.to_string()))?;
        let cookie_string =
            resolve_cookie_string(env_name, user_cookies, admin_cookies, self.registry);

        let mut course_steps = Vec::new();
        for (course_code, student_ids) in group_students_by_course(&input.records) {
            let request = PreparedRequest::new(
                HttpMethod::Post,
                format!("{base_url}{ADD_STUDENTS_TO_COURSE_PATH}"),
            )
            .with_cookies(cookie_string.clone())
            .with_body(json!({
                "semesterId": input.semester_id,
                "courseCode": course_code,
                "studentIds": student_ids,
            }));

            let outcome = self.client.execute(&request).await;
            let failed = !outcome.success;
            course_steps.push(StepResult {
                course_code,
                outcome,
            });
            if failed {
                log::warn!("dual call aborted: course enrolment failed");
                return Ok(DualCallReport {
                    course_steps,
                    subject_step: None,
                    success: false,
                });
            }
        }

        let students: Vec<_> = input
            .records
            .iter()
            .map(|r| json!({"studentId": r.student_id, "subjectId": r.subject_id}))
            .collect();
        let request = PreparedRequest::new(
            HttpMethod::Post,
            format!("{base_url}{ADD_STUDENTS_TO_SUBJECT_PATH}"),
        )
        .with_cookies(cookie_string)
        .with_body(json!({
            "semesterId": input.semester_id,
            "students": students,
        }));

        let subject_outcome = self.client.execute(&request).await;
        let success = subject_outcome.success;
        Ok(DualCallReport {
            course_steps,
            subject_step: Some(subject_outcome),
            success,
        })
    }
}

/// Distinct course codes in first-seen order, each with its deduplicated
/// student-id list.
fn group_students_by_course(records: &[StudentSubjectRecord]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for record in records {
        match grouped.iter_mut().find(|(code, _)| *code == record.course_code) {
            Some((_, students)) => {
                if !students.contains(&record.student_id) {
                    students.push(record.student_id.clone());
                }
            }
            None => grouped.push((record.course_code.clone(), vec![record.student_id.clone()])),
        }
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedClient;
    use pretty_assertions::assert_eq;

    fn input() -> DualCallInput {
        DualCallInput {
            semester_id: "sem-1".to_string(),
            records: vec![
                record("C1", "s1", "m1"),
                record("C1", "s2", "m1"),
                record("C2", "s3", "m2"),
                record("C1", "s1", "m2"), // duplicate student for C1
            ],
        }
    }

    fn record(course: &str, student: &str, subject: &str) -> StudentSubjectRecord {
        StudentSubjectRecord {
            course_code: course.to_string(),
            student_id: student.to_string(),
            subject_id: subject.to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_success_issues_all_calls() {
        let client = ScriptedClient::always_ok();
        let registry = EnvironmentRegistry::new();
        let runner = DualCallRunner::new(&client, &registry);

        let report = runner
            .run("SIT", &BTreeMap::new(), &BTreeMap::new(), &input())
            .await
            .unwrap();

        // Two distinct courses plus the subject call.
        assert_eq!(client.call_count(), 3);
        assert!(report.success);
        assert_eq!(report.course_steps.len(), 2);
        assert!(report.subject_step.is_some());

        let calls = client.recorded();
        assert!(calls[0].url.ends_with(ADD_STUDENTS_TO_COURSE_PATH));
        assert!(calls[2].url.ends_with(ADD_STUDENTS_TO_SUBJECT_PATH));

        // Student ids deduplicated per course.
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["studentIds"], serde_json::json!(["s1", "s2"]));
        // Subject call carries the full record list.
        let body = calls[2].body.as_ref().unwrap();
        assert_eq!(body["students"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_phase_one_failure_short_circuits() {
        // First course call fails with 500.
        let client = ScriptedClient::new([500]);
        let registry = EnvironmentRegistry::new();
        let runner = DualCallRunner::new(&client, &registry);

        let report = runner
            .run("SIT", &BTreeMap::new(), &BTreeMap::new(), &input())
            .await
            .unwrap();

        // The second course call and the subject call were never issued.
        assert_eq!(client.call_count(), 1);
        assert!(!report.success);
        assert!(report.subject_step.is_none());
        assert_eq!(report.failure().map(|o| o.status), Some(500));
        assert_eq!(report.combined().status, 500);
    }

    #[tokio::test]
    async fn test_second_course_failure_still_skips_subject() {
        let client = ScriptedClient::new([200, 503]);
        let registry = EnvironmentRegistry::new();
        let runner = DualCallRunner::new(&client, &registry);

        let report = runner
            .run("SIT", &BTreeMap::new(), &BTreeMap::new(), &input())
            .await
            .unwrap();

        assert_eq!(client.call_count(), 2);
        assert!(report.subject_step.is_none());
        assert_eq!(report.failure().map(|o| o.status), Some(503));
    }

    #[test]
    fn test_input_from_sheet() {
        let sheet = Sheet::new(
            vec![
                "Course Code".to_string(),
                "Student ID".to_string(),
                "Subject ID".to_string(),
            ],
            vec![
                vec!["C1".into(), "s1".into(), "m1".into()],
                vec!["C2".into(), "s2".into(), "m2".into()],
            ],
        );

        let input = DualCallInput::from_sheet("sem-1", &sheet).unwrap();
        assert_eq!(input.records.len(), 2);
        assert_eq!(input.records[0], record("C1", "s1", "m1"));

        let missing = Sheet::new(vec!["Course Code".to_string()], vec![]);
        assert!(DualCallInput::from_sheet("sem-1", &missing).is_err());
    }

    #[tokio::test]
    async fn test_combined_record_aggregates_timings() {
        let client = ScriptedClient::always_ok();
        let registry = EnvironmentRegistry::new();
        let runner = DualCallRunner::new(&client, &registry);

        let report = runner
            .run("SIT", &BTreeMap::new(), &BTreeMap::new(), &input())
            .await
            .unwrap();

        let combined = report.combined();
        // Three calls at 7ms each from the scripted client.
        assert_eq!(combined.time_ms, 21);
        assert!(combined.success);
        let body = combined.body.as_json().unwrap();
        assert_eq!(body["courses"].as_array().unwrap().len(), 2);
    }
}
