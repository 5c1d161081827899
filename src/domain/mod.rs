//! Core domain layer. No external I/O dependencies.
//!
//! Backend value types, menu heuristics and UI session state live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod menu;
pub mod session;

pub use entities::{
    AgeGroup, AnalysisReport, AnalysisRequest, ApiKeyInfo, DietaryPreference, DocumentOutcome,
    DocumentStart, DocumentUpload, GuidelineCategory, HealthCondition, JobState, JobStatus,
    Section,
};
pub use errors::DomainError;
pub use session::{DocumentState, InputMode, Session};
