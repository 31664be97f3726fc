//! Built-in smoke-test scenarios.
//!
//! Each scenario is either a single saved-style API definition fired as-is,
//! or one of the two composite flows (the two-phase enrolment and the auto
//! mark entry batch). Payloads carry fixed sample identifiers from the dev
//! datasets.

use std::collections::BTreeMap;

use beacon_application::use_cases::{DualCallInput, MarkEntryBatch, StudentSubjectRecord};
use beacon_domain::environment::Module;
use beacon_domain::request::{ApiDefinition, HttpMethod};
use serde_json::json;

const SAMPLE_SEMESTER_ID: &str = "01976233-54b1-7b09-a782-dd589f0624eb";
const SAMPLE_SUBJECT_ID: &str = "d53ec2f2-1420-47db-a7ee-bb671be75bb5";

/// A single-call scenario or one of the composite flows.
pub enum Scenario {
    /// One API definition fired once.
    Single(Box<ApiDefinition>),
    /// Two-phase course/subject enrolment.
    Enrolment(DualCallInput),
    /// Sequential auto mark entry batch.
    MarkEntry(MarkEntryBatch),
}

/// Names accepted by `--scenario`, in display order.
pub const SCENARIO_NAMES: [&str; 12] = [
    "subject-components",
    "student-group-info",
    "sync-weightage",
    "generate-mark",
    "fake-student-flow",
    "clean-student-distinction",
    "incomplete-reminding",
    "course-award-dwm",
    "random-acad-standing",
    "sync-percentage",
    "enrol-students",
    "auto-mark-entry",
];

/// Builds the scenario for a name from [`SCENARIO_NAMES`].
#[must_use]
pub fn build(name: &str) -> Option<Scenario> {
    match name {
        "subject-components" => Some(Scenario::Single(Box::new(subject_components()))),
        "student-group-info" => Some(Scenario::Single(Box::new(student_group_info()))),
        "sync-weightage" => Some(Scenario::Single(Box::new(sync_weightage()))),
        "generate-mark" => Some(Scenario::Single(Box::new(generate_mark()))),
        "fake-student-flow" => Some(Scenario::Single(Box::new(fake_student_flow()))),
        "clean-student-distinction" => {
            Some(Scenario::Single(Box::new(clean_student_distinction())))
        }
        "incomplete-reminding" => Some(Scenario::Single(Box::new(incomplete_reminding()))),
        "course-award-dwm" => Some(Scenario::Single(Box::new(course_award_dwm()))),
        "random-acad-standing" => Some(Scenario::Single(Box::new(random_acad_standing()))),
        "sync-percentage" => Some(Scenario::Single(Box::new(sync_percentage()))),
        "enrol-students" => Some(Scenario::Enrolment(enrolment_input())),
        "auto-mark-entry" => Some(Scenario::MarkEntry(mark_entry_batch())),
        _ => None,
    }
}

fn subject_components() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Subject components",
        "/subjectcomponent/list",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "semesterId": SAMPLE_SEMESTER_ID,
        "subjectId": SAMPLE_SUBJECT_ID,
        "query": "",
    });
    api
}

fn student_group_info() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Student group info",
        "/studentsubjectmark/studentgroupinfo",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "semesterId": SAMPLE_SEMESTER_ID,
        "subjectId": SAMPLE_SUBJECT_ID,
        "studentIds": [
            "e87c7cfb-c081-45d3-b0e9-24e4cc51a975",
            "2426cfc9-5bed-4c29-b9a4-dc96cfe0ff91",
        ],
    });
    api
}

fn sync_weightage() -> ApiDefinition {
    ApiDefinition::new(
        "Sync weightage",
        "/subjectcomponent/syncweightage",
        HttpMethod::Get,
        Module::Ex,
    )
}

fn generate_mark() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Generate mark data",
        "/assessmentmarkentry/devcreatedata",
        HttpMethod::Get,
        Module::Ex,
    );
    api.params = BTreeMap::from([
        ("semesterId".to_string(), SAMPLE_SEMESTER_ID.to_string()),
        ("subjectId".to_string(), SAMPLE_SUBJECT_ID.to_string()),
        ("minMarkPercentage".to_string(), "60".to_string()),
    ]);
    api
}

fn fake_student_flow() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Fake student flow",
        "/assessmentstudentinfo/devcreate",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "semesterId": SAMPLE_SEMESTER_ID,
        "courseCode": "DEV7",
        "subjectIds": [
            "968cab22-3dd1-469e-8456-34496b07820a",
            "235e667a-fab9-4da6-93cb-824f3bea9489",
            "0c55727a-ab4d-44e8-8e53-86da9a4c520f",
        ],
    });
    api
}

fn clean_student_distinction() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Clean student distinction",
        "/subjectawarddistinction/devcleandatastudentdistinction",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "semesterId": SAMPLE_SEMESTER_ID,
        "subjectIds": [SAMPLE_SUBJECT_ID],
    });
    api
}

fn incomplete_reminding() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Incomplete mark entry reminding",
        "/studentcomponentmark/devincompletereminding",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "semesterId": SAMPLE_SEMESTER_ID,
        "subjectId": SAMPLE_SUBJECT_ID,
        "currentDate": "2025-07-23T05:00:00.000Z",
    });
    api
}

fn course_award_dwm() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Course award DWM",
        "/courseawarddiplomamerit/devcreate",
        HttpMethod::Get,
        Module::Ex,
    );
    api.params = BTreeMap::from([("semesterId".to_string(), SAMPLE_SEMESTER_ID.to_string())]);
    api
}

fn random_acad_standing() -> ApiDefinition {
    let mut api = ApiDefinition::new(
        "Random academic standing",
        "/processingresult/devrandomacadstanding",
        HttpMethod::Post,
        Module::Ex,
    );
    api.body = json!({
        "courses": [
            {
                "courseId": "01983a9a-f59e-73ca-9013-82e4b50b161b",
                "semesterId": SAMPLE_SEMESTER_ID,
            },
        ],
        "numberOfRandom": 18,
        "topX": 25,
    });
    api
}

fn sync_percentage() -> ApiDefinition {
    ApiDefinition::new(
        "Sync award distinction percentage",
        "/subjectawarddistinction/syncpercentage",
        HttpMethod::Get,
        Module::Ex,
    )
}

fn enrolment_input() -> DualCallInput {
    let record = |course: &str, student: &str, subject: &str| StudentSubjectRecord {
        course_code: course.to_string(),
        student_id: student.to_string(),
        subject_id: subject.to_string(),
    };
    DualCallInput {
        semester_id: SAMPLE_SEMESTER_ID.to_string(),
        records: vec![
            record("DEV7", "e87c7cfb-c081-45d3-b0e9-24e4cc51a975", SAMPLE_SUBJECT_ID),
            record("DEV7", "2426cfc9-5bed-4c29-b9a4-dc96cfe0ff91", SAMPLE_SUBJECT_ID),
        ],
    }
}

fn mark_entry_batch() -> MarkEntryBatch {
    MarkEntryBatch {
        semester_id: SAMPLE_SEMESTER_ID.to_string(),
        subject_codes: vec!["DEV7".to_string(), "DEV70529".to_string()],
        student_ids: vec![
            "e87c7cfb-c081-45d3-b0e9-24e4cc51a975".to_string(),
            "2426cfc9-5bed-4c29-b9a4-dc96cfe0ff91".to_string(),
        ],
    }
}
