//! Per-teacher submission detail
//!
//! Lists every reviewed (passed or failed) submission a teacher handled in
//! the range, with links to the student's recording and the teacher's reply.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::grading::non_empty;
use super::store::{ActivityField, ReportStore, SubmissionQuery};
use super::DateRange;
use crate::db::schemas::{SubmissionDoc, UserDoc, REVIEWED_STATUSES};
use crate::types::{ReportError, Result};

pub const MISSING_SUBMISSION_PARAMS: &str =
    r#"Missing "from", "to", or "teacher" query parameters!"#;

/// Raw query string of `GET /submissions`
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub teacher: Option<String>,
}

/// Validated submission detail input
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub range: DateRange,
    /// Teacher display name, matched exactly after trimming
    pub teacher: String,
}

impl SubmissionParams {
    pub fn into_request(self) -> Result<SubmissionRequest> {
        match (non_empty(&self.from), non_empty(&self.to), non_empty(&self.teacher)) {
            (Some(from), Some(to), Some(teacher)) => Ok(SubmissionRequest {
                range: DateRange::parse(Some(from), Some(to))?,
                teacher: teacher.to_string(),
            }),
            _ => Err(ReportError::MissingParameter(MISSING_SUBMISSION_PARAMS.into())),
        }
    }
}

/// One reviewed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRow {
    pub student_name: String,
    pub submission_url: Option<String>,
    pub status: Option<String>,
    pub teacher_response_audio: Option<String>,
    pub teacher_response_text: Option<String>,
}

impl SubmissionRow {
    fn new(submission: &SubmissionDoc, student: &UserDoc) -> Self {
        Self {
            student_name: student.display_name(),
            submission_url: submission.submission_url(),
            status: submission.status.clone(),
            teacher_response_audio: submission.latest_feedback_url(),
            teacher_response_text: submission.feedback_text(),
        }
    }
}

/// Join and filter already-fetched submissions.
///
/// Submissions whose student or teacher cannot be resolved are dropped.
pub fn detail_rows(
    submissions: &[SubmissionDoc],
    users: &HashMap<ObjectId, UserDoc>,
    teacher_name: &str,
) -> Vec<SubmissionRow> {
    submissions
        .iter()
        .filter_map(|s| {
            let student = users.get(&s.student?)?;
            let teacher = users.get(&s.teacher?)?;
            (teacher.display_name() == teacher_name).then(|| SubmissionRow::new(s, student))
        })
        .collect()
}

/// Builds the submission detail list from a store
pub struct SubmissionReport<'a> {
    store: &'a dyn ReportStore,
}

impl<'a> SubmissionReport<'a> {
    pub fn new(store: &'a dyn ReportStore) -> Self {
        Self { store }
    }

    pub async fn build(&self, request: &SubmissionRequest) -> Result<Vec<SubmissionRow>> {
        let query = SubmissionQuery::new(ActivityField::CreatedAt, request.range)
            .with_statuses(REVIEWED_STATUSES);
        let submissions = self.store.find_submissions(&query).await?;

        let user_ids: Vec<ObjectId> = submissions
            .iter()
            .flat_map(|s| [s.student, s.teacher])
            .flatten()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<ObjectId, UserDoc> = self
            .store
            .find_users(&user_ids)
            .await?
            .into_iter()
            .filter_map(|u| u._id.map(|id| (id, u)))
            .collect();

        Ok(detail_rows(&submissions, &users, &request.teacher))
    }
}
