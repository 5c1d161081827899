//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors (reqwest, multipart, session store) into these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Cannot connect to the backend: {0}")]
    Connection(String),

    #[error("Error communicating with backend: {0}")]
    Transport(String),

    #[error("Backend error: {status} - {body}")]
    Backend { status: u16, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Unexpected backend response: {0}")]
    UnexpectedResponse(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job not found or expired")]
    JobNotFound,

    /// Job stayed pending/running for every allowed poll.
    #[error("Job polling gave up after {polls} attempts")]
    PollTimeout { polls: u32 },

    #[error("Session error: {0}")]
    Session(String),

    #[error("Web server error: {0}")]
    Server(String),
}

impl DomainError {
    /// Message shown in the UI error banner.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Timeout(_) => {
                "Request timed out. The AI analysis is taking longer than expected.".to_string()
            }
            DomainError::Connection(_) => {
                "Cannot connect to the backend. Please ensure the backend server is running."
                    .to_string()
            }
            DomainError::Backend { status, body } => {
                format!("Backend error: {} - {}", status, body)
            }
            DomainError::JobFailed(reason) => format!("Job failed: {}", reason),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_includes_status_and_body() {
        let err = DomainError::Backend {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.user_message(), "Backend error: 503 - overloaded");
    }

    #[test]
    fn test_timeout_message_is_friendly() {
        let err = DomainError::Timeout("operation timed out".to_string());
        assert!(err.user_message().starts_with("Request timed out"));
    }
}
