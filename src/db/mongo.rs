//! MongoDB client, read-only collection wrapper and report store

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

use crate::db::schemas::{
    SubmissionDoc, SurveyDoc, UserDoc, SUBMISSION_COLLECTION, SURVEY_COLLECTION, TEACHER_ROLE,
    USER_COLLECTION,
};
use crate::report::{DateRange, ReportStore, SubmissionQuery};
use crate::types::ReportError;

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the server answers a ping.
    ///
    /// `db_name` overrides the database named in the URI.
    pub async fn new(uri: &str, db_name: Option<&str>) -> Result<Self, ReportError> {
        info!("Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| ReportError::Database(format!("Invalid MongoDB URI: {}", e)))?;

        // Fail fast instead of hanging on an unreachable server
        options.server_selection_timeout = Some(Duration::from_secs(3));
        options.connect_timeout = Some(Duration::from_secs(3));

        let db_name = db_name
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .ok_or_else(|| {
                ReportError::Config("No database in MONGO_URI and MONGODB_DB not set".into())
            })?;

        let client = Client::with_options(options)?;
        client.database(&db_name).run_command(doc! { "ping": 1 }).await?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self { client, db_name })
    }

    /// Get a typed collection
    pub fn collection<T>(&self, name: &str) -> MongoCollection<T>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        MongoCollection {
            inner: self.client.database(&self.db_name).collection::<T>(name),
        }
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed read-only MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    /// Find all documents matching `filter`, optionally sorted
    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<T>, ReportError> {
        let mut find = self.inner.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let cursor = find.await.map_err(|e| {
            ReportError::Database(format!("Find on '{}' failed: {}", self.inner.name(), e))
        })?;

        cursor.try_collect().await.map_err(|e| {
            ReportError::Database(format!("Reading '{}' failed: {}", self.inner.name(), e))
        })
    }
}

/// Range filter on a timestamp field, bounds inclusive
fn range_filter(range: &DateRange) -> Document {
    doc! {
        "$gte": bson::DateTime::from_chrono(range.from),
        "$lte": bson::DateTime::from_chrono(range.to),
    }
}

/// [`ReportStore`] backed by the production MongoDB collections
#[derive(Clone)]
pub struct MongoReportStore {
    users: MongoCollection<UserDoc>,
    submissions: MongoCollection<SubmissionDoc>,
    surveys: MongoCollection<SurveyDoc>,
}

impl MongoReportStore {
    pub fn new(client: &MongoClient) -> Self {
        Self {
            users: client.collection(USER_COLLECTION),
            submissions: client.collection(SUBMISSION_COLLECTION),
            surveys: client.collection(SURVEY_COLLECTION),
        }
    }
}

#[async_trait]
impl ReportStore for MongoReportStore {
    async fn find_submissions(
        &self,
        query: &SubmissionQuery,
    ) -> Result<Vec<SubmissionDoc>, ReportError> {
        if query.range.is_empty() {
            return Ok(Vec::new());
        }

        let field = query.field.field_name();
        let mut filter = Document::new();
        filter.insert(field, range_filter(&query.range));
        let mut sort = Document::new();
        sort.insert(field, 1);
        if let Some(statuses) = &query.statuses {
            filter.insert("status", doc! { "$in": statuses.clone() });
        }
        debug!(?filter, "Querying submissions");

        self.submissions
            .find_many(filter, Some(sort))
            .await
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<UserDoc>, ReportError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.users
            .find_many(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await
    }

    async fn find_teachers(&self) -> Result<Vec<UserDoc>, ReportError> {
        self.users
            .find_many(doc! { "role": TEACHER_ROLE }, Some(doc! { "_id": 1 }))
            .await
    }

    async fn find_surveys(&self, range: &DateRange) -> Result<Vec<SurveyDoc>, ReportError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        self.surveys
            .find_many(
                doc! { "createdAt": range_filter(range) },
                Some(doc! { "createdAt": 1 }),
            )
            .await
    }
}
