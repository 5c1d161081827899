//! Document workflow: upload -> poll job -> fetch content -> extract menu items.
//!
//! Runs as a background task per upload and writes its outcome into the session.

use crate::domain::menu::{
    FALLBACK_PRESELECT, fallback_dishes, parse_menu_lines_lenient, parse_menu_lines_strict,
};
use crate::domain::{DocumentOutcome, DocumentStart, DocumentUpload, DomainError, JobState, JobStatus};
use crate::ports::{BackendPort, SharedSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub struct DocumentService {
    backend: Arc<dyn BackendPort>,
    poll_interval: Duration,
    max_polls: u32,
}

impl DocumentService {
    pub fn new(backend: Arc<dyn BackendPort>, poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            backend,
            poll_interval,
            max_polls,
        }
    }

    /// Run the full flow for one upload.
    pub async fn process(
        &self,
        api_key: &str,
        upload: &DocumentUpload,
    ) -> Result<DocumentOutcome, DomainError> {
        if !upload.is_supported() {
            return Err(DomainError::InvalidInput(format!(
                "Unsupported file type: {}",
                upload.file_name
            )));
        }

        match self.backend.start_document_job(api_key, upload).await? {
            DocumentStart::Started { job_id } => {
                info!(job_id = %job_id, file = %upload.file_name, "document processing started");
                self.poll_until_complete(api_key, &job_id).await?;
                info!(job_id = %job_id, "document processing completed");

                let content = match self.backend.extract_menu(api_key, &job_id).await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(job_id = %job_id, error = %e, "document content fetch failed");
                        None
                    }
                };
                match content {
                    Some(content) => {
                        let items = self.extract_menu_items(api_key, &content).await;
                        info!(job_id = %job_id, items = items.len(), "menu items extracted");
                        Ok(DocumentOutcome::Extracted {
                            job_id,
                            content,
                            items,
                        })
                    }
                    None => {
                        warn!(job_id = %job_id, "no document content; preselecting common dishes");
                        Ok(DocumentOutcome::ContentUnavailable {
                            job_id,
                            preselected: fallback_dishes()
                                .into_iter()
                                .take(FALLBACK_PRESELECT)
                                .collect(),
                        })
                    }
                }
            }
            DocumentStart::Fallback { menu_items, error } => {
                warn!(error = ?error, "backend used fallback items");
                let items = if menu_items.is_empty() {
                    fallback_dishes()
                } else {
                    menu_items
                };
                Ok(DocumentOutcome::Fallback { items, error })
            }
            DocumentStart::CacheHit { menu_items } => {
                info!(items = menu_items.len(), "document cache hit");
                Ok(DocumentOutcome::CacheHit { items: menu_items })
            }
        }
    }

    /// Poll job status until it completes, fails, disappears or polls run out.
    pub async fn poll_until_complete(
        &self,
        api_key: &str,
        job_id: &str,
    ) -> Result<JobState, DomainError> {
        for attempt in 1..=self.max_polls {
            let state = self.backend.job_status(api_key, job_id).await?;
            match &state.status {
                JobStatus::Completed => return Ok(state),
                JobStatus::Failed => {
                    return Err(DomainError::JobFailed(
                        state.error.unwrap_or_else(|| "Unknown error".to_string()),
                    ));
                }
                JobStatus::NotFound => return Err(DomainError::JobNotFound),
                JobStatus::Pending | JobStatus::Running => {
                    debug!(job_id, attempt, progress = ?state.progress, "job in progress");
                }
                JobStatus::Unknown(raw) => {
                    warn!(job_id, attempt, status = %raw, "unknown job status");
                }
            }
            if attempt < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        Err(DomainError::PollTimeout {
            polls: self.max_polls,
        })
    }

    /// Menu items from document text. The backend is asked to look at the text
    /// first; if it does not answer, the stricter offline heuristic is used.
    pub async fn extract_menu_items(&self, api_key: &str, content: &str) -> Vec<String> {
        match self.backend.assist_menu_extraction(api_key, content).await {
            Ok(()) => parse_menu_lines_lenient(content),
            Err(e) => {
                warn!(error = %e, "assisted extraction failed, using simple parsing");
                parse_menu_lines_strict(content)
            }
        }
    }

    /// Process `upload` on a background task and store the outcome in `session`.
    /// The caller marks the session as processing before spawning.
    pub fn spawn(
        self: &Arc<Self>,
        session: SharedSession,
        api_key: String,
        upload: Arc<DocumentUpload>,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let file_key = upload.file_key();
            let result = service.process(&api_key, &upload).await;
            let mut guard = session.lock().await;
            match result {
                Ok(outcome) => {
                    guard.apply_document_outcome(&file_key, &upload.file_name, outcome);
                }
                Err(e) => {
                    error!(file = %upload.file_name, error = %e, "document processing failed");
                    guard.fail_document(&file_key, &upload.file_name, e.user_message());
                }
            }
        })
    }
}
