//! Assignment submission schema
//!
//! One document per recitation a student submits. Teachers grade it by
//! attaching audio feedback files or writing feedback text.

use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::report::ActivityField;

/// Collection name for assignment submissions
pub const SUBMISSION_COLLECTION: &str = "assignmentpassdatas";

/// Statuses that mark a submission as reviewed
pub const REVIEWED_STATUSES: [&str; 2] = ["passed", "failed"];

/// Uploaded artifact referenced by URL
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FileRef {
    #[serde(default)]
    pub url: Option<String>,
}

impl FileRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Submission document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub student: Option<ObjectId>,

    #[serde(default)]
    pub teacher: Option<ObjectId>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime>,

    #[serde(default)]
    pub updated_at: Option<DateTime>,

    /// Student's recording(s)
    #[serde(default)]
    pub attachments: Option<Vec<FileRef>>,

    /// Teacher's audio responses, oldest first
    #[serde(default)]
    pub feedback_files: Option<Vec<FileRef>>,

    #[serde(default)]
    pub feedback: Option<String>,
}

impl SubmissionDoc {
    /// A submission is graded once it carries a feedback file or non-empty feedback text
    pub fn is_graded(&self) -> bool {
        self.feedback_file_count() > 0 || self.feedback.as_deref().is_some_and(|f| !f.is_empty())
    }

    pub fn feedback_file_count(&self) -> usize {
        self.feedback_files.as_ref().map_or(0, Vec::len)
    }

    /// Timestamp used for range membership
    pub fn timestamp(&self, field: ActivityField) -> Option<DateTime> {
        match field {
            ActivityField::CreatedAt => self.created_at,
            ActivityField::UpdatedAt => self.updated_at,
        }
    }

    /// URL of the first attachment
    pub fn submission_url(&self) -> Option<String> {
        self.attachments
            .as_ref()
            .and_then(|files| files.first())
            .and_then(|f| f.url.clone())
    }

    /// URL of the most recent feedback file
    pub fn latest_feedback_url(&self) -> Option<String> {
        self.feedback_files
            .as_ref()
            .and_then(|files| files.last())
            .and_then(|f| f.url.clone())
    }

    /// Feedback text, only when no audio feedback exists
    pub fn feedback_text(&self) -> Option<String> {
        if self.feedback_file_count() == 0 {
            self.feedback.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_feedback_is_ungraded() {
        let doc = SubmissionDoc {
            feedback_files: Some(vec![]),
            feedback: Some(String::new()),
            ..Default::default()
        };
        assert!(!doc.is_graded());
        assert!(!SubmissionDoc::default().is_graded());
    }

    #[test]
    fn test_feedback_file_grades() {
        let doc = SubmissionDoc {
            feedback_files: Some(vec![FileRef::new("a")]),
            feedback: None,
            ..Default::default()
        };
        assert!(doc.is_graded());
        assert_eq!(doc.latest_feedback_url().as_deref(), Some("a"));
        assert_eq!(doc.feedback_text(), None);
    }

    #[test]
    fn test_feedback_text_grades() {
        let doc = SubmissionDoc {
            feedback: Some("Good tajweed".into()),
            ..Default::default()
        };
        assert!(doc.is_graded());
        assert_eq!(doc.feedback_text().as_deref(), Some("Good tajweed"));
        assert_eq!(doc.latest_feedback_url(), None);
    }

    #[test]
    fn test_text_suppressed_when_audio_present() {
        let doc = SubmissionDoc {
            feedback_files: Some(vec![FileRef::new("first.mp3"), FileRef::new("second.mp3")]),
            feedback: Some("also wrote text".into()),
            attachments: Some(vec![FileRef::new("rec1.m4a"), FileRef::new("rec2.m4a")]),
            ..Default::default()
        };
        assert_eq!(doc.latest_feedback_url().as_deref(), Some("second.mp3"));
        assert_eq!(doc.submission_url().as_deref(), Some("rec1.m4a"));
        assert_eq!(doc.feedback_text(), None);
    }

    #[test]
    fn test_deserialize_null_arrays() {
        let doc = bson::doc! {
            "student": ObjectId::new(),
            "teacher": ObjectId::new(),
            "status": "passed",
            "createdAt": DateTime::now(),
            "feedbackFiles": bson::Bson::Null,
            "feedback": bson::Bson::Null,
        };
        let sub: SubmissionDoc = bson::from_document(doc).unwrap();
        assert_eq!(sub.feedback_file_count(), 0);
        assert!(!sub.is_graded());
        assert_eq!(sub.submission_url(), None);
    }
}
