//! Assignment grading report
//!
//! System overview (total / graded / ungraded submissions) plus a per-teacher
//! table of graded submission counts for a date range.
//!
//! Gender policy: when a gender is given, the overview and every teacher
//! count use the same submission set, namely submissions whose student has
//! that gender. The teacher table additionally lists only teachers of that
//! gender. Submissions whose student record no longer exists are left out
//! of every count.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::names::{display_name_or, UNNAMED_TEACHER};
use super::roster::TeacherAllowList;
use super::store::{ActivityField, ReportStore, SubmissionQuery};
use super::DateRange;
use crate::db::schemas::{SubmissionDoc, UserDoc};
use crate::types::{ReportError, Result};

pub const MISSING_REPORT_PARAMS: &str = r#"Missing "from" or "to" or "gender" query parameters."#;

/// Raw query string of `GET /report`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub gender: Option<String>,
    pub activity_field: Option<String>,
    pub only_activity: Option<String>,
}

/// Which students' submissions count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenderFilter {
    All,
    Only(String),
}

impl GenderFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    pub fn admits(&self, user: &UserDoc) -> bool {
        match self {
            Self::All => true,
            Self::Only(gender) => user.has_gender(gender),
        }
    }
}

/// Validated grading report input
#[derive(Debug, Clone)]
pub struct GradingRequest {
    pub range: DateRange,
    pub gender: GenderFilter,
    pub field: ActivityField,
}

impl GradingParams {
    pub fn into_request(self) -> Result<GradingRequest> {
        let required = (
            non_empty(&self.from),
            non_empty(&self.to),
            non_empty(&self.gender),
        );
        let (from, to, gender) = match required {
            (Some(from), Some(to), Some(gender)) => (from, to, gender),
            _ => return Err(ReportError::MissingParameter(MISSING_REPORT_PARAMS.into())),
        };

        let range = DateRange::parse(Some(from), Some(to))?;

        let field = match (non_empty(&self.activity_field), non_empty(&self.only_activity)) {
            (Some(field), _) => field.parse()?,
            (None, Some(flag)) if is_truthy(flag) => ActivityField::UpdatedAt,
            _ => ActivityField::CreatedAt,
        };

        Ok(GradingRequest {
            range,
            gender: GenderFilter::parse(gender),
            field,
        })
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_truthy(flag: &str) -> bool {
    matches!(flag.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

/// One row of the per-teacher table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRow {
    pub id: usize,
    pub teacher: String,
    pub assignments_graded: u64,
}

/// Response body of `GET /report`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingSummary {
    pub total_assignments: u64,
    pub graded_assignments: u64,
    pub ungraded_assignments: u64,
    pub teachers: Vec<TeacherRow>,
}

/// Aggregate already-fetched records into the report.
///
/// `students` maps user id to user for every student referenced by
/// `submissions`; `teachers` is every user with the teacher role.
pub fn summarize(
    submissions: &[SubmissionDoc],
    students: &HashMap<ObjectId, UserDoc>,
    teachers: &[UserDoc],
    gender: &GenderFilter,
    allow_list: Option<&TeacherAllowList>,
) -> GradingSummary {
    let counted: Vec<&SubmissionDoc> = submissions
        .iter()
        .filter(|s| {
            s.student
                .and_then(|id| students.get(&id))
                .is_some_and(|student| gender.admits(student))
        })
        .collect();

    let total = counted.len() as u64;
    let mut graded = 0u64;
    let mut graded_by_teacher: HashMap<ObjectId, u64> = HashMap::new();

    for submission in counted.iter().filter(|s| s.is_graded()) {
        graded += 1;
        if let Some(teacher) = submission.teacher {
            *graded_by_teacher.entry(teacher).or_default() += 1;
        }
    }

    let mut rows: Vec<(String, u64)> = teachers
        .iter()
        .filter(|t| gender.admits(t))
        .filter_map(|t| {
            let name = display_name_or(
                [t.first_name.as_deref(), t.middle_name.as_deref(), t.last_name.as_deref()],
                UNNAMED_TEACHER,
            );
            if allow_list.is_some_and(|list| !list.contains(&name)) {
                return None;
            }
            let count = t
                ._id
                .and_then(|id| graded_by_teacher.get(&id).copied())
                .unwrap_or(0);
            Some((name, count))
        })
        .collect();

    // Stable: equal counts keep store order
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    GradingSummary {
        total_assignments: total,
        graded_assignments: graded,
        ungraded_assignments: total - graded,
        teachers: rows
            .into_iter()
            .enumerate()
            .map(|(i, (teacher, assignments_graded))| TeacherRow {
                id: i + 1,
                teacher,
                assignments_graded,
            })
            .collect(),
    }
}

/// Builds the grading report from a store
pub struct GradingReport<'a> {
    store: &'a dyn ReportStore,
    allow_list: Option<&'a TeacherAllowList>,
}

impl<'a> GradingReport<'a> {
    pub fn new(store: &'a dyn ReportStore, allow_list: Option<&'a TeacherAllowList>) -> Self {
        Self { store, allow_list }
    }

    pub async fn build(&self, request: &GradingRequest) -> Result<GradingSummary> {
        let submissions = self
            .store
            .find_submissions(&SubmissionQuery::new(request.field, request.range))
            .await?;

        let student_ids: Vec<ObjectId> = submissions
            .iter()
            .filter_map(|s| s.student)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let students: HashMap<ObjectId, UserDoc> = self
            .store
            .find_users(&student_ids)
            .await?
            .into_iter()
            .filter_map(|u| u._id.map(|id| (id, u)))
            .collect();

        let teachers = self.store.find_teachers().await?;

        debug!(
            submissions = submissions.len(),
            students = students.len(),
            teachers = teachers.len(),
            field = request.field.field_name(),
            "Building grading report"
        );

        Ok(summarize(
            &submissions,
            &students,
            &teachers,
            &request.gender,
            self.allow_list,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::FileRef;
    use crate::report::MemoryStore;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        students: HashMap<ObjectId, UserDoc>,
        teachers: Vec<UserDoc>,
        submissions: Vec<SubmissionDoc>,
    }

    fn graded(student: &UserDoc, teacher: &UserDoc) -> SubmissionDoc {
        SubmissionDoc {
            student: student._id,
            teacher: teacher._id,
            feedback_files: Some(vec![FileRef::new("reply.mp3")]),
            ..Default::default()
        }
    }

    fn ungraded(student: &UserDoc, teacher: &UserDoc) -> SubmissionDoc {
        SubmissionDoc {
            student: student._id,
            teacher: teacher._id,
            feedback: Some(String::new()),
            ..Default::default()
        }
    }

    fn fixture() -> Fixture {
        let ahmed = UserDoc::new("teacher", "male", "Ahmed", "", "Nuur");
        let faadumo = UserDoc::new("teacher", "Female", "Faadumo", "Cali", "Xasan");
        let idle = UserDoc::new("teacher", "male", "", "", "");
        let boy = UserDoc::new("student", "Male", "Abdi", "", "Yusuf");
        let girl = UserDoc::new("student", "female", "Sahra", "", "Maxamed");

        let submissions = vec![
            graded(&boy, &ahmed),
            graded(&boy, &ahmed),
            ungraded(&boy, &ahmed),
            graded(&girl, &faadumo),
            SubmissionDoc {
                student: girl._id,
                teacher: faadumo._id,
                feedback: Some("Mashallah".into()),
                ..Default::default()
            },
            graded(&girl, &faadumo),
            graded(&girl, &ahmed),
            // orphaned student: never counted
            SubmissionDoc {
                student: Some(ObjectId::new()),
                teacher: ahmed._id,
                feedback: Some("x".into()),
                ..Default::default()
            },
        ];

        Fixture {
            students: [boy, girl]
                .into_iter()
                .map(|u| (u._id.unwrap(), u))
                .collect(),
            teachers: vec![ahmed, faadumo, idle],
            submissions,
        }
    }

    #[test]
    fn test_all_genders() {
        let f = fixture();
        let summary = summarize(&f.submissions, &f.students, &f.teachers, &GenderFilter::All, None);

        assert_eq!(summary.total_assignments, 7);
        assert_eq!(summary.graded_assignments, 6);
        assert_eq!(summary.ungraded_assignments, 1);

        let rows: Vec<(usize, &str, u64)> = summary
            .teachers
            .iter()
            .map(|r| (r.id, r.teacher.as_str(), r.assignments_graded))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "Ahmed Nuur", 3),
                (2, "Faadumo Cali Xasan", 3),
                (3, "Unnamed Teacher", 0),
            ]
        );
    }

    #[test]
    fn test_gender_filter_applies_to_overview_and_table() {
        let f = fixture();
        let summary = summarize(
            &f.submissions,
            &f.students,
            &f.teachers,
            &GenderFilter::parse("FEMALE"),
            None,
        );

        assert_eq!(summary.total_assignments, 4);
        assert_eq!(summary.graded_assignments, 4);
        assert_eq!(summary.ungraded_assignments, 0);
        assert_eq!(summary.teachers.len(), 1);
        assert_eq!(summary.teachers[0].teacher, "Faadumo Cali Xasan");
        assert_eq!(summary.teachers[0].assignments_graded, 3);
    }

    #[test]
    fn test_unknown_gender_yields_empty_report() {
        let f = fixture();
        let summary = summarize(
            &f.submissions,
            &f.students,
            &f.teachers,
            &GenderFilter::parse("unknown"),
            None,
        );
        assert_eq!(summary, GradingSummary::default());
    }

    #[test]
    fn test_allow_list_restricts_rows_only() {
        let f = fixture();
        let allow = TeacherAllowList::new(["ahmed nuur"]);
        let summary = summarize(
            &f.submissions,
            &f.students,
            &f.teachers,
            &GenderFilter::All,
            Some(&allow),
        );

        assert_eq!(summary.total_assignments, 7);
        assert_eq!(summary.teachers.len(), 1);
        assert_eq!(summary.teachers[0].id, 1);
        assert_eq!(summary.teachers[0].teacher, "Ahmed Nuur");
    }

    #[test]
    fn test_partition_and_ordering_invariants() {
        let f = fixture();
        for gender in ["all", "male", "female", "other"] {
            let gender = GenderFilter::parse(gender);
            let s = summarize(&f.submissions, &f.students, &f.teachers, &gender, None);
            assert_eq!(s.graded_assignments + s.ungraded_assignments, s.total_assignments);
            assert!(s
                .teachers
                .windows(2)
                .all(|w| w[0].assignments_graded >= w[1].assignments_graded));
            for (i, row) in s.teachers.iter().enumerate() {
                assert_eq!(row.id, i + 1);
            }
        }
    }

    #[test]
    fn test_params_validation() {
        let missing_from = GradingParams {
            to: Some("2024-01-31".into()),
            gender: Some("all".into()),
            ..Default::default()
        };
        match missing_from.into_request() {
            Err(ReportError::MissingParameter(msg)) => assert_eq!(msg, MISSING_REPORT_PARAMS),
            other => panic!("expected MissingParameter, got {:?}", other),
        }

        let blank_gender = GradingParams {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-31".into()),
            gender: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(blank_gender.into_request(), Err(ReportError::MissingParameter(_))));
    }

    #[test]
    fn test_params_activity_field() {
        let base = || GradingParams {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-31".into()),
            gender: Some("All".into()),
            ..Default::default()
        };

        let req = base().into_request().unwrap();
        assert_eq!(req.field, ActivityField::CreatedAt);
        assert_eq!(req.gender, GenderFilter::All);

        let req = GradingParams {
            only_activity: Some("true".into()),
            ..base()
        }
        .into_request()
        .unwrap();
        assert_eq!(req.field, ActivityField::UpdatedAt);

        let req = GradingParams {
            activity_field: Some("createdAt".into()),
            only_activity: Some("true".into()),
            ..base()
        }
        .into_request()
        .unwrap();
        assert_eq!(req.field, ActivityField::CreatedAt);

        let err = GradingParams {
            activity_field: Some("gradedAt".into()),
            ..base()
        }
        .into_request();
        assert!(matches!(err, Err(ReportError::InvalidParameter(_))));
    }

    fn at(y: i32, m: u32, d: u32) -> Option<bson::DateTime> {
        let instant = Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap();
        Some(bson::DateTime::from_chrono(instant))
    }

    #[tokio::test]
    async fn test_build_counts_by_selected_timestamp() {
        let store = MemoryStore::new();
        let teacher = UserDoc::new("teacher", "female", "Faadumo", "Cali", "Xasan");
        let student = UserDoc::new("student", "female", "Hodan", "", "Cali");
        store.insert_user(teacher.clone()).await;
        store.insert_user(student.clone()).await;

        // Submitted in January, graded in March
        store
            .insert_submission(SubmissionDoc {
                created_at: at(2024, 1, 15),
                updated_at: at(2024, 3, 20),
                feedback: Some("Good".into()),
                ..graded(&student, &teacher)
            })
            .await;

        let report = GradingReport::new(&store, None);
        let march = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();

        let by_update = report
            .build(&GradingRequest {
                range: march,
                gender: GenderFilter::All,
                field: ActivityField::UpdatedAt,
            })
            .await
            .unwrap();
        assert_eq!(by_update.total_assignments, 1);
        assert_eq!(by_update.graded_assignments, 1);
        assert_eq!(by_update.teachers[0].teacher, "Faadumo Cali Xasan");
        assert_eq!(by_update.teachers[0].assignments_graded, 1);

        let by_creation = report
            .build(&GradingRequest {
                range: march,
                gender: GenderFilter::All,
                field: ActivityField::CreatedAt,
            })
            .await
            .unwrap();
        assert_eq!(by_creation.total_assignments, 0);
        assert_eq!(by_creation.teachers[0].assignments_graded, 0);
    }
}
