use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{CandidateFilter, JobFilter, JobPosting, User};

/// Errors that can occur when talking to the document store
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Handles all communication with the document store:
/// - User accounts and career profiles
/// - Job postings, candidate queries and the public listing
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub users: String,
    pub jobs: String,
}

/// Store-side query strings for one cascade stage
pub(crate) fn candidate_queries(filter: &CandidateFilter, limit: usize) -> Vec<String> {
    let mut queries = vec!["equal(\"isActive\", true)".to_string()];

    if let Some(tiers) = &filter.tiers {
        let names: Vec<String> = tiers.iter().map(|t| t.to_string()).collect();
        queries.push(format!("in(\"experience\", {})", json_value(&names)));
    }

    if let Some(skills) = &filter.skills {
        queries.push(format!("contains(\"skills\", {})", json_value(skills)));
    }

    queries.push("orderDesc(\"postedDate\")".to_string());
    queries.push(format!("limit({})", limit));
    queries
}

/// Store-side query strings for the public job listing
pub(crate) fn listing_queries(filter: &JobFilter) -> Vec<String> {
    let mut queries = vec!["equal(\"isActive\", true)".to_string()];

    if let Some(location) = &filter.location {
        queries.push(format!("contains(\"location\", {})", json_str(location)));
    }

    if let Some(tier) = filter.experience {
        queries.push(format!("equal(\"experience\", {})", json_str(&tier.to_string())));
    }

    if !filter.skills.is_empty() {
        queries.push(format!("contains(\"skills\", {})", json_value(&filter.skills)));
    }

    let page = filter.page.max(1);
    queries.push("orderDesc(\"postedDate\")".to_string());
    queries.push(format!("limit({})", filter.limit));
    queries.push(format!("offset({})", (page - 1) * filter.limit));
    queries
}

fn json_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn json_value(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_default()
}

impl AppwriteClient {
    /// Create a new store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    fn documents_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection_id
        )
    }

    fn status_error(status: reqwest::StatusCode, context: &str) -> AppwriteError {
        match status.as_u16() {
            401 | 403 => AppwriteError::Unauthorized,
            404 => AppwriteError::NotFound(context.to_string()),
            _ => AppwriteError::ApiError(format!("{}: {}", context, status)),
        }
    }

    /// GET a document list with the given query strings, returning the raw
    /// documents plus the store's total for the filter
    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[String],
    ) -> Result<(Vec<Value>, u64), AppwriteError> {
        let queries_json = serde_json::to_string(queries).unwrap_or_default();
        let url = format!(
            "{}?query={}",
            self.documents_url(collection_id),
            urlencoding::encode(&queries_json)
        );

        tracing::debug!("Listing documents: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response.status(), "Failed to list documents"));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);
        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?
            .to_vec();

        Ok((documents, total))
    }

    /// Parse a raw document, tolerating payloads wrapped under `data`
    fn parse_document<T: serde::de::DeserializeOwned>(doc: &Value) -> Option<T> {
        let data = doc.get("data").unwrap_or(doc);
        serde_json::from_value(data.clone()).ok()
    }

    /// Fetch a user by document ID
    pub async fn get_user(&self, user_id: &str) -> Result<User, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(&self.collections.users), user_id);

        tracing::debug!("Fetching user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(
                response.status(),
                &format!("User {} not found", user_id),
            ));
        }

        let json: Value = response.json().await?;
        Self::parse_document(&json)
            .ok_or_else(|| AppwriteError::InvalidResponse("Failed to parse user document".into()))
    }

    /// Look up an account by email, None when no account exists
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppwriteError> {
        let queries = vec![
            format!("equal(\"email\", {})", json_str(email)),
            "limit(1)".to_string(),
        ];

        let (documents, _) = self.list_documents(&self.collections.users, &queries).await?;
        Ok(documents.first().and_then(Self::parse_document))
    }

    /// Create a user document with the user's ID as the document ID
    pub async fn create_user(&self, user: &User) -> Result<(), AppwriteError> {
        let url = self.documents_url(&self.collections.users);

        let payload = serde_json::json!({
            "documentId": user.id,
            "data": user,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response.status(), "Failed to create user"));
        }

        tracing::debug!("Created user {}", user.id);
        Ok(())
    }

    /// Patch selected fields on a user document, returning the updated user
    pub async fn update_user(&self, user_id: &str, fields: Value) -> Result<User, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(&self.collections.users), user_id);

        let payload = serde_json::json!({ "data": fields });

        let response = self
            .client
            .patch(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(
                response.status(),
                &format!("Failed to update user {}", user_id),
            ));
        }

        let json: Value = response.json().await?;
        Self::parse_document(&json)
            .ok_or_else(|| AppwriteError::InvalidResponse("Failed to parse updated user".into()))
    }

    /// Fetch a job posting by document ID
    pub async fn get_job(&self, job_id: &str) -> Result<JobPosting, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(&self.collections.jobs), job_id);

        tracing::debug!("Fetching job: {}", job_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(
                response.status(),
                &format!("Job {} not found", job_id),
            ));
        }

        let json: Value = response.json().await?;
        Self::parse_document(&json)
            .ok_or_else(|| AppwriteError::InvalidResponse("Failed to parse job document".into()))
    }

    /// Fetch postings by ID, input order kept, missing documents skipped
    pub async fn get_jobs_by_ids(&self, ids: &[String]) -> Result<Vec<JobPosting>, AppwriteError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let queries = vec![
            format!("in(\"$id\", {})", json_value(ids)),
            format!("limit({})", ids.len()),
        ];

        let (documents, _) = self.list_documents(&self.collections.jobs, &queries).await?;

        let mut by_id: std::collections::HashMap<String, JobPosting> = documents
            .iter()
            .filter_map(|doc| Self::parse_document::<JobPosting>(doc))
            .map(|job| (job.id.clone(), job))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Run one cascade stage against the postings collection
    pub async fn query_jobs(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<JobPosting>, AppwriteError> {
        let queries = candidate_queries(filter, limit);
        let (documents, total) = self.list_documents(&self.collections.jobs, &queries).await?;

        let jobs: Vec<JobPosting> = documents
            .iter()
            .filter_map(|doc| Self::parse_document(doc))
            .collect();

        tracing::debug!("Queried {} candidate jobs (total: {})", jobs.len(), total);
        Ok(jobs)
    }

    /// Filtered, paginated public listing with the store total
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<(Vec<JobPosting>, usize), AppwriteError> {
        let queries = listing_queries(filter);
        let (documents, total) = self.list_documents(&self.collections.jobs, &queries).await?;

        let jobs: Vec<JobPosting> = documents
            .iter()
            .filter_map(|doc| Self::parse_document(doc))
            .collect();

        tracing::debug!("Listed {} jobs (total: {})", jobs.len(), total);
        Ok((jobs, total as usize))
    }
}
