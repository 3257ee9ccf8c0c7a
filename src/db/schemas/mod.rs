//! Database schemas for the report service
//!
//! Document structures for the collections the reports read. The service
//! never writes to these collections.

mod submission;
mod survey;
mod user;

pub use submission::{FileRef, SubmissionDoc, REVIEWED_STATUSES, SUBMISSION_COLLECTION};
pub use survey::{Platform, SurveyDoc, SURVEY_COLLECTION};
pub use user::{UserDoc, TEACHER_ROLE, USER_COLLECTION};
