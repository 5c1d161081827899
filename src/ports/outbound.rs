//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    AnalysisReport, AnalysisRequest, ApiKeyInfo, DocumentStart, DocumentUpload, DomainError,
    GuidelineCategory, JobState, Session,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Dietician backend API. Every call takes the user's API key; an empty key
/// sends no `Authorization` header.
#[async_trait::async_trait]
pub trait BackendPort: Send + Sync {
    /// True when `/health` (or `/` as a fallback) answers 200. Never errors.
    async fn health(&self) -> bool;

    /// Validate a key against `/api-info`.
    async fn api_info(&self, api_key: &str) -> Result<ApiKeyInfo, DomainError>;

    async fn analyze_menu(
        &self,
        api_key: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, DomainError>;

    /// Free-text food recommendations for `query`.
    async fn recommendations(&self, api_key: &str, query: &str) -> Result<String, DomainError>;

    /// Ask the backend to pick menu items out of document text. Only success
    /// matters to the caller; the answer itself is discarded.
    async fn assist_menu_extraction(&self, api_key: &str, content: &str)
    -> Result<(), DomainError>;

    /// Upload a document and start a processing job.
    async fn start_document_job(
        &self,
        api_key: &str,
        upload: &DocumentUpload,
    ) -> Result<DocumentStart, DomainError>;

    /// Current job state. A job unknown to the backend maps to `JobStatus::NotFound`.
    async fn job_status(&self, api_key: &str, job_id: &str) -> Result<JobState, DomainError>;

    /// Text content of a completed job. `None` when the job is gone or has no content.
    async fn extract_menu(&self, api_key: &str, job_id: &str)
    -> Result<Option<String>, DomainError>;

    /// Official guidelines as raw JSON.
    async fn guidelines(
        &self,
        api_key: &str,
        category: GuidelineCategory,
    ) -> Result<serde_json::Value, DomainError>;
}

/// A session shared between request handlers and background document jobs.
pub type SharedSession = Arc<Mutex<Session>>;

/// Session storage keyed by the browser's session cookie.
#[async_trait::async_trait]
pub trait SessionPort: Send + Sync {
    /// Returns the session for `id`, creating an empty one if unknown.
    async fn get_or_create(&self, id: Uuid) -> Result<SharedSession, DomainError>;

    /// Drops sessions idle for longer than `ttl`. Returns how many were removed.
    async fn purge_idle(&self, ttl: Duration) -> Result<usize, DomainError>;
}
