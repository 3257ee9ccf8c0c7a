//! Read-only store interface the report builders depend on.

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::str::FromStr;

use crate::db::schemas::{SubmissionDoc, SurveyDoc, UserDoc};
use crate::report::DateRange;
use crate::types::{ReportError, Result};

/// Submission timestamp that decides range membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityField {
    /// When the student submitted
    #[default]
    CreatedAt,
    /// When the submission was last touched, i.e. grading activity
    UpdatedAt,
}

impl ActivityField {
    /// Stored field name
    pub fn field_name(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl FromStr for ActivityField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "createdat" | "created" => Ok(Self::CreatedAt),
            "updatedat" | "updated" => Ok(Self::UpdatedAt),
            other => Err(ReportError::InvalidParameter(format!(
                "unknown activity field '{}' (expected createdAt or updatedAt)",
                other
            ))),
        }
    }
}

/// Filter for [`ReportStore::find_submissions`]
#[derive(Debug, Clone)]
pub struct SubmissionQuery {
    pub field: ActivityField,
    pub range: DateRange,
    /// Restrict to these statuses; `None` means any status
    pub statuses: Option<Vec<String>>,
}

impl SubmissionQuery {
    pub fn new(field: ActivityField, range: DateRange) -> Self {
        Self {
            field,
            range,
            statuses: None,
        }
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// Predicate applied by stores that filter in memory
    pub fn matches(&self, doc: &SubmissionDoc) -> bool {
        if !self.range.contains_bson(doc.timestamp(self.field)) {
            return false;
        }
        match &self.statuses {
            Some(statuses) => doc
                .status
                .as_deref()
                .is_some_and(|s| statuses.iter().any(|allowed| allowed == s)),
            None => true,
        }
    }
}

/// Source of the records behind every report.
///
/// Implementations push the range and status filters down; everything else
/// (joins, grouping, sorting) happens in the report builders.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Submissions matching `query`, ordered by the selected timestamp ascending
    async fn find_submissions(&self, query: &SubmissionQuery) -> Result<Vec<SubmissionDoc>>;

    /// Users with the given ids; unknown ids are skipped
    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<UserDoc>>;

    /// Every user whose role is teacher
    async fn find_teachers(&self) -> Result<Vec<UserDoc>>;

    /// Survey answers created inside `range`
    async fn find_surveys(&self, range: &DateRange) -> Result<Vec<SurveyDoc>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_activity_field_parse() {
        assert_eq!("createdAt".parse::<ActivityField>().unwrap(), ActivityField::CreatedAt);
        assert_eq!("UPDATEDAT".parse::<ActivityField>().unwrap(), ActivityField::UpdatedAt);
        assert_eq!("updated".parse::<ActivityField>().unwrap(), ActivityField::UpdatedAt);
        assert!("gradedAt".parse::<ActivityField>().is_err());
    }

    #[test]
    fn test_query_matches_status_and_range() {
        let range = DateRange::parse(Some("2024-05-01"), Some("2024-05-31")).unwrap();
        let query = SubmissionQuery::new(ActivityField::CreatedAt, range)
            .with_statuses(["passed", "failed"]);

        let at = |m, d, h| {
            bson::DateTime::from_chrono(Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap())
        };
        let inside = at(5, 10, 8);
        let outside = at(6, 1, 0);

        let mut doc = SubmissionDoc {
            status: Some("passed".into()),
            created_at: Some(inside),
            ..Default::default()
        };
        assert!(query.matches(&doc));

        doc.status = Some("pending".into());
        assert!(!query.matches(&doc));

        doc.status = Some("failed".into());
        doc.created_at = Some(outside);
        assert!(!query.matches(&doc));
    }
}
