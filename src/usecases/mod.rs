//! Application use cases. Orchestrate domain logic via ports.

pub mod auth_service;
pub mod dietician_service;
pub mod document_service;

pub use auth_service::{Access, AuthService};
pub use dietician_service::{AnalysisForm, AnalysisOutcome, DieticianService};
pub use document_service::DocumentService;
