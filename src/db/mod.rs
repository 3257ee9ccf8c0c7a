//! Database layer
//!
//! MongoDB access for users, assignment submissions and install surveys.

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection, MongoReportStore};
pub use schemas::{SubmissionDoc, SurveyDoc, UserDoc};
