//! In-memory report store
//!
//! Holds fixture records behind the same interface as MongoDB. Used by the
//! test suites and for running the reports against exported JSON data.

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::{ReportStore, SubmissionQuery};
use super::DateRange;
use crate::db::schemas::{SubmissionDoc, SurveyDoc, UserDoc};
use crate::types::Result;

/// Thread-safe in-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<UserDoc>>>,
    submissions: Arc<RwLock<Vec<SubmissionDoc>>>,
    surveys: Arc<RwLock<Vec<SurveyDoc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: UserDoc) -> Option<ObjectId> {
        let id = user._id;
        self.users.write().await.push(user);
        id
    }

    pub async fn insert_submission(&self, submission: SubmissionDoc) {
        self.submissions.write().await.push(submission);
    }

    pub async fn insert_survey(&self, survey: SurveyDoc) {
        self.surveys.write().await.push(survey);
    }

    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.submissions.write().await.clear();
        self.surveys.write().await.clear();
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_submissions(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionDoc>> {
        let submissions = self.submissions.read().await;
        let mut found: Vec<SubmissionDoc> = submissions
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.timestamp(query.field));
        Ok(found)
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<UserDoc>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u._id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn find_teachers(&self) -> Result<Vec<UserDoc>> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.is_teacher()).cloned().collect())
    }

    async fn find_surveys(&self, range: &DateRange) -> Result<Vec<SurveyDoc>> {
        let surveys = self.surveys.read().await;
        Ok(surveys
            .iter()
            .filter(|s| range.contains_bson(s.created_at))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ActivityField;
    use chrono::{TimeZone, Utc};

    fn at(day: u32) -> bson::DateTime {
        bson::DateTime::from_chrono(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_submissions_sorted_by_timestamp() {
        let store = MemoryStore::new();
        for day in [5, 2, 9] {
            store
                .insert_submission(SubmissionDoc {
                    created_at: Some(at(day)),
                    ..Default::default()
                })
                .await;
        }

        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-06")).unwrap();
        let found = store
            .find_submissions(&SubmissionQuery::new(ActivityField::CreatedAt, range))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].created_at, Some(at(2)));
        assert_eq!(found[1].created_at, Some(at(5)));
    }

    #[tokio::test]
    async fn test_find_users_and_teachers() {
        let store = MemoryStore::new();
        let teacher = store
            .insert_user(UserDoc::new("teacher", "male", "Cumar", "", "Axmed"))
            .await
            .unwrap();
        let student = store
            .insert_user(UserDoc::new("student", "male", "Xasan", "", "Cali"))
            .await
            .unwrap();

        assert_eq!(store.find_teachers().await.unwrap().len(), 1);
        let users = store.find_users(&[student, ObjectId::new()]).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]._id, Some(student));
        assert_ne!(teacher, student);

        store.clear().await;
        assert!(store.find_teachers().await.unwrap().is_empty());
    }
}
