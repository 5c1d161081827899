//! Mock backend adapter for running the UI without the analysis service.
//!
//! Returns hardcoded responses for development and testing purposes.

use crate::domain::{
    AnalysisReport, AnalysisRequest, ApiKeyInfo, DocumentStart, DocumentUpload, DomainError,
    GuidelineCategory, JobState, JobStatus, Section,
};
use crate::ports::BackendPort;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Keys the mock accepts start with this prefix.
pub const MOCK_KEY_PREFIX: &str = "fai_";

const MOCK_MENU: &str = "LUNCH SPECIALS\n\
    Hainanese Chicken Rice 5.50\n\
    Laksa Lemak 6.80\n\
    Char Kway Teow 6.00/7.50\n\
    Fish Soup Bee Hoon 7.20\n\
    Kaya Toast Set 4.20 | with kopi\n";

/// Mock backend.
///
/// Simulates network latency with a configurable delay. Any key with the
/// `fai_` prefix is accepted; document jobs complete on the first poll.
pub struct MockBackend {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockBackend {
    /// Create a new mock backend with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock backend with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    async fn latency(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }

    fn check_key(api_key: &str) -> Result<(), DomainError> {
        if api_key.starts_with(MOCK_KEY_PREFIX) {
            Ok(())
        } else {
            Err(DomainError::Backend {
                status: 401,
                body: "Invalid API key".to_string(),
            })
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BackendPort for MockBackend {
    async fn health(&self) -> bool {
        true
    }

    async fn api_info(&self, api_key: &str) -> Result<ApiKeyInfo, DomainError> {
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(ApiKeyInfo {
            rate_limit: Some("100".to_string()),
            remaining: Some("99".to_string()),
            permissions: vec!["analyze".to_string(), "upload".to_string()],
        })
    }

    async fn analyze_menu(
        &self,
        api_key: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, DomainError> {
        info!(
            items = request.menu_items.len(),
            "[MOCK] Simulating menu analysis"
        );
        self.latency().await;
        Self::check_key(api_key)?;

        Ok(AnalysisReport {
            recommendations: Section::Items(
                request
                    .menu_items
                    .iter()
                    .map(|item| {
                        format!(
                            "[MOCK] {}: ask for less gravy and add a side of greens.",
                            item
                        )
                    })
                    .collect(),
            ),
            nutritional_analysis: Section::Fields(vec![
                ("Items Analyzed".to_string(), request.menu_items.len().to_string()),
                ("Age Group".to_string(), request.age_group.to_string()),
            ]),
            guidelines_compliance: Section::Text(
                "[MOCK] Half plate fruit and vegetables is not met.".to_string(),
            ),
            alternatives: Section::Items(vec![
                "[MOCK] Sliced Fish Soup instead of Fried Fish Bee Hoon".to_string(),
            ]),
        })
    }

    async fn recommendations(&self, api_key: &str, query: &str) -> Result<String, DomainError> {
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(format!(
            "[MOCK] For \"{}\": try Yong Tau Foo soup, brown rice Economy Rice with two vegetables, or Thunder Tea Rice.",
            query
        ))
    }

    async fn assist_menu_extraction(
        &self,
        api_key: &str,
        _content: &str,
    ) -> Result<(), DomainError> {
        self.latency().await;
        Self::check_key(api_key)
    }

    async fn start_document_job(
        &self,
        api_key: &str,
        upload: &DocumentUpload,
    ) -> Result<DocumentStart, DomainError> {
        info!(file = %upload.file_name, "[MOCK] Simulating document upload");
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(DocumentStart::Started {
            job_id: format!("mock-{}", upload.file_key()),
        })
    }

    async fn job_status(&self, api_key: &str, _job_id: &str) -> Result<JobState, DomainError> {
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(JobState {
            status: JobStatus::Completed,
            progress: Some(100.0),
            error: None,
        })
    }

    async fn extract_menu(
        &self,
        api_key: &str,
        _job_id: &str,
    ) -> Result<Option<String>, DomainError> {
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(Some(MOCK_MENU.to_string()))
    }

    async fn guidelines(
        &self,
        api_key: &str,
        category: GuidelineCategory,
    ) -> Result<serde_json::Value, DomainError> {
        self.latency().await;
        Self::check_key(api_key)?;
        Ok(json!({
            "category": category.as_str(),
            "source": "[MOCK] Health Promotion Board",
            "guidelines": ["Fill half your plate with fruit and vegetables"],
        }))
    }
}
