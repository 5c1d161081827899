//! HTTP adapter for the dietician backend.
//!
//! Implements `BackendPort` with reqwest. Maps transport failures (timeout,
//! refused connection, non-2xx) into `DomainError` for the UI banners.

use crate::domain::{
    AnalysisReport, AnalysisRequest, ApiKeyInfo, DocumentStart, DocumentUpload, DomainError,
    GuidelineCategory, JobState,
};
use crate::ports::BackendPort;
use crate::shared::config::BackendTimeouts;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest backend error body echoed into a banner.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    timeouts: BackendTimeouts,
}

impl HttpBackend {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `base_url` - Backend root (e.g., "http://localhost:8000"); a trailing `/` is ignored
    /// * `timeouts` - Per-endpoint request timeouts
    pub fn new(base_url: impl Into<String>, timeouts: BackendTimeouts) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
        if api_key.is_empty() {
            request
        } else {
            request.bearer_auth(api_key)
        }
    }

    /// Send and require a 2xx response.
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, DomainError> {
        let response = request.send().await.map_err(map_transport_error)?;
        check_status(endpoint, response).await
    }

    async fn get_recommendations(
        &self,
        api_key: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<Value, DomainError> {
        let req = Self::authorize(self.client.post(self.url("/get-recommendations")), api_key)
            .query(&[("query", query)])
            .timeout(timeout);
        let response = self.send("/get-recommendations", req).await?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<Value, DomainError> {
        let body = response.text().await.map_err(map_transport_error)?;
        serde_json::from_str(&body).map_err(|e| DomainError::Decode(e.to_string()))
    }
}

async fn check_status(endpoint: &str, response: Response) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    warn!(endpoint, status = %status, body = %text, "backend returned error");
    Err(DomainError::Backend {
        status: status.as_u16(),
        body: text.chars().take(MAX_ERROR_BODY).collect(),
    })
}

fn map_transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::Timeout(e.to_string())
    } else if e.is_connect() {
        DomainError::Connection(e.to_string())
    } else {
        DomainError::Transport(e.to_string())
    }
}

#[async_trait::async_trait]
impl BackendPort for HttpBackend {
    async fn health(&self) -> bool {
        for path in ["/health", "/"] {
            let result = self
                .client
                .get(self.url(path))
                .timeout(self.timeouts.health)
                .send()
                .await;
            match result {
                Ok(response) if response.status() == StatusCode::OK => return true,
                Ok(response) => {
                    debug!(path, status = %response.status(), "health probe not OK");
                }
                Err(e) => {
                    debug!(path, error = %e, "health probe failed");
                    return false;
                }
            }
        }
        false
    }

    async fn api_info(&self, api_key: &str) -> Result<ApiKeyInfo, DomainError> {
        let request = Self::authorize(self.client.get(self.url("/api-info")), api_key)
            .timeout(self.timeouts.health);
        let response = self.send("/api-info", request).await?;
        // A 200 means the key works even if the metadata is not JSON.
        let info = Self::read_json(response)
            .await
            .map(|v| ApiKeyInfo::from_value(&v))
            .unwrap_or_default();
        Ok(info)
    }

    async fn analyze_menu(
        &self,
        api_key: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, DomainError> {
        info!(
            items = request.menu_items.len(),
            age_group = %request.age_group,
            preferences = request.dietary_preferences.len(),
            conditions = request.health_conditions.len(),
            "sending menu to backend for analysis"
        );
        let req = Self::authorize(self.client.post(self.url("/analyze-menu")), api_key)
            .json(request)
            .timeout(self.timeouts.analysis);
        let response = self.send("/analyze-menu", req).await?;
        let body = Self::read_json(response).await?;
        info!("menu analysis complete");
        Ok(AnalysisReport::from_value(&body))
    }

    async fn recommendations(&self, api_key: &str, query: &str) -> Result<String, DomainError> {
        debug!(query_len = query.len(), "requesting recommendations");
        let body = self
            .get_recommendations(api_key, query, self.timeouts.recommendation)
            .await?;
        match body.get("recommendations") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(DomainError::Decode(
                "response has no recommendations field".to_string(),
            )),
            Some(other) => Ok(other.to_string()),
        }
    }

    async fn assist_menu_extraction(
        &self,
        api_key: &str,
        content: &str,
    ) -> Result<(), DomainError> {
        debug!(content_len = content.len(), "requesting assisted menu extraction");
        let query = format!("Extract menu items from: {}", content);
        self.get_recommendations(api_key, &query, self.timeouts.extraction)
            .await?;
        Ok(())
    }

    async fn start_document_job(
        &self,
        api_key: &str,
        upload: &DocumentUpload,
    ) -> Result<DocumentStart, DomainError> {
        info!(
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "uploading document for processing"
        );
        let mut part = reqwest::multipart::Part::stream_with_length(
            upload.bytes.clone(),
            upload.bytes.len() as u64,
        )
        .file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| DomainError::InvalidInput(format!("bad content type: {}", e)))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let req = Self::authorize(self.client.post(self.url("/extract-menu-items")), api_key)
            .multipart(form)
            .timeout(self.timeouts.job);
        let response = self.send("/extract-menu-items", req).await?;
        let body = Self::read_json(response).await?;
        DocumentStart::from_value(&body)
    }

    async fn job_status(&self, api_key: &str, job_id: &str) -> Result<JobState, DomainError> {
        let path = format!("/jobs/{}", job_id);
        let req = Self::authorize(self.client.get(self.url(&path)), api_key)
            .timeout(self.timeouts.status);
        let response = req.send().await.map_err(map_transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(job_id, "job not found");
            return Ok(JobState::not_found());
        }
        let response = check_status(&path, response).await?;
        let body = Self::read_json(response).await?;
        Ok(JobState::from_value(&body))
    }

    async fn extract_menu(
        &self,
        api_key: &str,
        job_id: &str,
    ) -> Result<Option<String>, DomainError> {
        let path = format!("/jobs/{}/extract-menu", job_id);
        let req = Self::authorize(self.client.post(self.url(&path)), api_key)
            .timeout(self.timeouts.job);
        let response = req.send().await.map_err(map_transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(job_id, "job not found for menu extraction");
            return Ok(None);
        }
        let response = check_status(&path, response).await?;
        let body = Self::read_json(response).await?;
        let content = body
            .get("document_content")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string);
        debug!(
            job_id,
            content_len = content.as_ref().map_or(0, String::len),
            "menu extraction response"
        );
        Ok(content)
    }

    async fn guidelines(
        &self,
        api_key: &str,
        category: GuidelineCategory,
    ) -> Result<Value, DomainError> {
        let path = format!("/singapore-guidelines/{}", category);
        let req = Self::authorize(self.client.get(self.url(&path)), api_key)
            .timeout(self.timeouts.guidelines);
        let response = self.send(&path, req).await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/", BackendTimeouts::default());
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.url("/health"), "http://localhost:8000/health");
    }
}
