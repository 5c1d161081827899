//! Implements SessionPort in memory.
//!
//! Sessions are lost on restart; the UI only holds form state, so that is acceptable.

use crate::domain::{DomainError, Session};
use crate::ports::{SessionPort, SharedSession};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// In-memory session map: session id -> session.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionPort for MemorySessionStore {
    async fn get_or_create(&self, id: Uuid) -> Result<SharedSession, DomainError> {
        if let Some(session) = self.sessions.read().await.get(&id) {
            return Ok(Arc::clone(session));
        }
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id).or_insert_with(|| {
            debug!(session = %id, "new session");
            Arc::new(Mutex::new(Session::default()))
        });
        Ok(Arc::clone(session))
    }

    async fn purge_idle(&self, ttl: Duration) -> Result<usize, DomainError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| DomainError::Session(e.to_string()))?;
        let cutoff = Utc::now() - ttl;

        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();
        for (id, session) in sessions.iter() {
            // A locked session is in use (request or document job), so it is not idle.
            if let Ok(guard) = session.try_lock() {
                if guard.last_seen < cutoff && !guard.document.is_processing() {
                    expired.push(*id);
                }
            }
        }
        for id in &expired {
            sessions.remove(id);
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentUpload;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_same_id_returns_same_session() {
        let store = MemorySessionStore::new();
        let id = Uuid::new_v4();
        let a = store.get_or_create(id).await.unwrap();
        a.lock().await.set_api_key("fai_x");
        let b = store.get_or_create(id).await.unwrap();
        assert_eq!(b.lock().await.api_key, "fai_x");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_idle_removes_stale_only() {
        let store = MemorySessionStore::new();
        let stale = store.get_or_create(Uuid::new_v4()).await.unwrap();
        stale.lock().await.last_seen = Utc::now() - chrono::Duration::hours(2);
        let _fresh = store.get_or_create(Uuid::new_v4()).await.unwrap();

        let removed = store.purge_idle(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_idle_keeps_busy_sessions() {
        let store = MemorySessionStore::new();
        let hour_ago = Utc::now() - chrono::Duration::hours(1);

        let processing = store.get_or_create(Uuid::new_v4()).await.unwrap();
        {
            let mut guard = processing.lock().await;
            guard.start_document(Arc::new(DocumentUpload {
                file_name: "menu.pdf".to_string(),
                content_type: None,
                bytes: Bytes::from_static(b"%PDF"),
            }));
            guard.last_seen = hour_ago;
        }

        let locked = store.get_or_create(Uuid::new_v4()).await.unwrap();
        locked.lock().await.last_seen = hour_ago;
        let held = locked.lock().await;

        let removed = store.purge_idle(Duration::from_secs(60)).await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.len().await, 2);

        // Once released and idle, the locked one goes.
        drop(held);
        let removed = store.purge_idle(Duration::from_secs(60)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(processing.lock().await.document.is_processing());
    }
}
