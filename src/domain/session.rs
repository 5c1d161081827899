//! Per-browser UI state. Survives across requests the way form state would
//! survive a page rerun.

use crate::domain::menu::dedup_case_insensitive;
use crate::domain::{ApiKeyInfo, DocumentOutcome, DocumentUpload};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// How the user provides menu items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Upload,
    Type,
}

impl InputMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upload" => Some(InputMode::Upload),
            "type" => Some(InputMode::Type),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Upload => "upload",
            InputMode::Type => "type",
        }
    }
}

/// Lifecycle of the most recent upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocumentState {
    #[default]
    Idle,
    Processing {
        file_key: String,
        file_name: String,
        started_at: DateTime<Utc>,
    },
    Ready {
        file_key: String,
        file_name: String,
        summary: String,
    },
    Failed {
        file_key: String,
        file_name: String,
        error: String,
    },
}

impl DocumentState {
    pub fn file_key(&self) -> Option<&str> {
        match self {
            DocumentState::Idle => None,
            DocumentState::Processing { file_key, .. }
            | DocumentState::Ready { file_key, .. }
            | DocumentState::Failed { file_key, .. } => Some(file_key),
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, DocumentState::Processing { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub api_key: String,
    pub api_key_valid: bool,
    /// Set after a successful key test; shown in the sidebar.
    pub api_key_info: Option<ApiKeyInfo>,
    pub input_mode: InputMode,
    pub extracted_items: Vec<String>,
    pub selected_menu_items: Vec<String>,
    pub custom_additions: String,
    pub document_content: Option<String>,
    pub processed_files: HashSet<String>,
    pub document: DocumentState,
    /// Kept so the last upload can be reprocessed without sending it again.
    pub last_upload: Option<Arc<DocumentUpload>>,
    pub last_seen: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_key_valid: false,
            api_key_info: None,
            input_mode: InputMode::default(),
            extracted_items: Vec::new(),
            selected_menu_items: Vec::new(),
            custom_additions: String::new(),
            document_content: None,
            processed_files: HashSet::new(),
            document: DocumentState::Idle,
            last_upload: None,
            last_seen: Utc::now(),
        }
    }
}

impl Session {
    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    /// Stores a new key. Changing the key drops any earlier validation.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        if key != self.api_key {
            self.api_key = key.to_string();
            self.api_key_valid = false;
            self.api_key_info = None;
        }
    }

    pub fn clear_api_key(&mut self) {
        self.api_key.clear();
        self.api_key_valid = false;
        self.api_key_info = None;
    }

    pub fn has_document_items(&self) -> bool {
        !self.extracted_items.is_empty()
    }

    pub fn is_processed(&self, file_key: &str) -> bool {
        self.processed_files.contains(file_key)
    }

    pub fn start_document(&mut self, upload: Arc<DocumentUpload>) {
        self.document = DocumentState::Processing {
            file_key: upload.file_key(),
            file_name: upload.file_name.clone(),
            started_at: Utc::now(),
        };
        self.input_mode = InputMode::Upload;
        self.last_upload = Some(upload);
    }

    /// Folds a finished document job into the session.
    pub fn apply_document_outcome(
        &mut self,
        file_key: &str,
        file_name: &str,
        outcome: DocumentOutcome,
    ) {
        let summary = match outcome {
            DocumentOutcome::Extracted { content, items, .. } => {
                self.document_content = Some(content);
                if items.is_empty() {
                    "Document content extracted, but no menu items were recognised.".to_string()
                } else {
                    self.store_items(file_key, items);
                    format!("Found {} menu items!", self.extracted_items.len())
                }
            }
            DocumentOutcome::ContentUnavailable { preselected, .. } => {
                self.selected_menu_items = preselected;
                "Failed to extract content from document. Using common Singapore dishes as fallback."
                    .to_string()
            }
            DocumentOutcome::Fallback { items, error } => {
                let count = items.len();
                self.extracted_items = items;
                self.processed_files.insert(file_key.to_string());
                match error {
                    Some(err) => format!(
                        "Document processing encountered issues ({}), using {} common Singapore dishes.",
                        err, count
                    ),
                    None => format!("Using {} common Singapore dishes.", count),
                }
            }
            DocumentOutcome::CacheHit { items } => {
                self.store_items(file_key, items);
                format!("Found {} menu items!", self.extracted_items.len())
            }
        };
        self.document = DocumentState::Ready {
            file_key: file_key.to_string(),
            file_name: file_name.to_string(),
            summary,
        };
    }

    pub fn fail_document(&mut self, file_key: &str, file_name: &str, error: String) {
        self.document = DocumentState::Failed {
            file_key: file_key.to_string(),
            file_name: file_name.to_string(),
            error,
        };
    }

    /// Allows the same file to be processed again.
    pub fn reprocess(&mut self, file_key: &str) {
        self.processed_files.remove(file_key);
        if self.document.file_key() == Some(file_key) {
            self.document = DocumentState::Idle;
        }
    }

    /// Selection = chosen extracted items (in submitted order) + comma-separated extras.
    pub fn update_selection(&mut self, selected: &[String], custom: &str) {
        let mut items: Vec<String> = selected
            .iter()
            .filter(|item| self.extracted_items.contains(item))
            .cloned()
            .collect();
        items.extend(
            custom
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string),
        );
        self.custom_additions = custom.trim().to_string();
        self.selected_menu_items = items;
    }

    pub fn selection_summary(&self) -> Option<String> {
        if self.selected_menu_items.is_empty() {
            return None;
        }
        let shown = self
            .selected_menu_items
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let more = if self.selected_menu_items.len() > 3 {
            "..."
        } else {
            ""
        };
        Some(format!(
            "Selected {} items: {}{}",
            self.selected_menu_items.len(),
            shown,
            more
        ))
    }

    fn store_items(&mut self, file_key: &str, items: Vec<String>) {
        self.extracted_items = dedup_case_insensitive(items);
        self.processed_files.insert(file_key.to_string());
    }
}
