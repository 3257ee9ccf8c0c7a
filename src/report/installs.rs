//! App-install attribution
//!
//! Buckets survey answers by referral source and platform. Every configured
//! bucket appears in the output, zero rows included, followed by a total row.

use serde::{Deserialize, Serialize};

use super::grading::non_empty;
use super::roster::AgentRoster;
use super::store::ReportStore;
use super::DateRange;
use crate::db::schemas::{Platform, SurveyDoc};
use crate::types::{ReportError, Result};

pub const MISSING_SURVEY_PARAMS: &str = r#"Missing "from" or "to" query parameters!"#;

pub const OTHER_AGENTS: &str = "Other Agents";
pub const SOCIAL_MEDIA: &str = "Social Media";
pub const FRIEND: &str = "Friend";
pub const OTHER: &str = "Other";
pub const TOTAL: &str = "Total";

/// Raw query string of `GET /survey`
#[derive(Debug, Default, Deserialize)]
pub struct SurveyParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SurveyParams {
    pub fn into_range(self) -> Result<DateRange> {
        match (non_empty(&self.from), non_empty(&self.to)) {
            (Some(from), Some(to)) => DateRange::parse(Some(from), Some(to)),
            _ => Err(ReportError::MissingParameter(MISSING_SURVEY_PARAMS.into())),
        }
    }
}

/// One bucket of the attribution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributionRow {
    pub agent: String,
    pub android: u64,
    pub ios: u64,
    pub total: u64,
}

impl AttributionRow {
    fn empty(agent: &str) -> Self {
        Self {
            agent: agent.to_string(),
            android: 0,
            ios: 0,
            total: 0,
        }
    }

    fn record(&mut self, platform: Platform) {
        match platform {
            Platform::Android => self.android += 1,
            Platform::Ios => self.ios += 1,
        }
        self.total += 1;
    }
}

/// Bucket a batch of survey answers.
///
/// Rows start in roster order followed by the fixed source buckets, are
/// stably sorted by total descending, and end with the total row.
pub fn attribute(surveys: &[SurveyDoc], roster: &AgentRoster) -> Vec<AttributionRow> {
    let agent_count = roster.len();
    let mut rows: Vec<AttributionRow> = roster
        .iter()
        .map(|(_, name)| AttributionRow::empty(name))
        .chain([OTHER_AGENTS, SOCIAL_MEDIA, FRIEND, OTHER].map(AttributionRow::empty))
        .collect();

    let other_agents = agent_count;
    let social = agent_count + 1;
    let friend = agent_count + 2;
    let other = agent_count + 3;

    for survey in surveys {
        let bucket = match survey.kind.as_deref() {
            Some("agent") => survey
                .agent_id
                .and_then(|id| roster.iter().position(|(known, _)| known == id))
                .unwrap_or(other_agents),
            Some("social media") => social,
            Some("friend") => friend,
            _ => other,
        };
        rows[bucket].record(survey.platform());
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));

    let mut total = AttributionRow::empty(TOTAL);
    for row in &rows {
        total.android += row.android;
        total.ios += row.ios;
        total.total += row.total;
    }
    rows.push(total);
    rows
}

/// Builds the attribution table from a store
pub struct InstallReport<'a> {
    store: &'a dyn ReportStore,
    roster: &'a AgentRoster,
}

impl<'a> InstallReport<'a> {
    pub fn new(store: &'a dyn ReportStore, roster: &'a AgentRoster) -> Self {
        Self { store, roster }
    }

    pub async fn build(&self, range: &DateRange) -> Result<Vec<AttributionRow>> {
        let surveys = self.store.find_surveys(range).await?;
        Ok(attribute(&surveys, self.roster))
    }
}
