//! API-key handling. Stores the key in the session and validates it against the backend.

use crate::domain::{ApiKeyInfo, DomainError, Session};
use crate::ports::{BackendPort, SharedSession};
use std::sync::Arc;
use tracing::{info, warn};

/// What the main area of the page may show for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No key entered yet: show the introduction.
    KeyRequired,
    /// Key entered but not tested.
    KeyUnverified,
    Granted,
}

pub struct AuthService {
    backend: Arc<dyn BackendPort>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn BackendPort>) -> Self {
        Self { backend }
    }

    pub fn access(session: &Session) -> Access {
        if session.api_key.is_empty() {
            Access::KeyRequired
        } else if !session.api_key_valid {
            Access::KeyUnverified
        } else {
            Access::Granted
        }
    }

    /// Store a key without testing it.
    pub async fn set_api_key(&self, session: &SharedSession, key: &str) {
        session.lock().await.set_api_key(key);
    }

    /// Test the session's key against `/api-info` and record the verdict.
    ///
    /// If the key is replaced while the request is in flight, the verdict is
    /// dropped and `InvalidInput` asks for a fresh test.
    pub async fn test_api_key(&self, session: &SharedSession) -> Result<ApiKeyInfo, DomainError> {
        let key = session.lock().await.api_key.clone();
        if key.is_empty() {
            return Err(DomainError::InvalidInput("No API key provided".to_string()));
        }

        let result = self.backend.api_info(&key).await;

        let mut guard = session.lock().await;
        if guard.api_key != key {
            info!("API key changed during test; verdict discarded");
            return Err(DomainError::InvalidInput(
                "API key changed while it was being tested. Test it again.".to_string(),
            ));
        }
        match &result {
            Ok(info) => {
                info!("API key validated");
                guard.api_key_valid = true;
                guard.api_key_info = Some(info.clone());
            }
            Err(e) => {
                warn!(error = %e, "API key rejected");
                guard.api_key_valid = false;
                guard.api_key_info = None;
            }
        }
        result
    }
}
