//! Browser UI adapter. Implements InputPort with an axum server that renders
//! maud pages and keeps per-browser state behind a session cookie.

pub mod error;
pub mod forms;
pub mod pages;
pub mod routes;
pub mod styles;

use crate::domain::DomainError;
use crate::ports::{InputPort, SessionPort};
use crate::usecases::{AuthService, DieticianService, DocumentService};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "dietician_session";

/// Upper bound on how often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub dietician: Arc<DieticianService>,
    pub documents: Arc<DocumentService>,
    pub sessions: Arc<dyn SessionPort>,
    /// Shown in the "backend disconnected" hint.
    pub backend_url: String,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api-key", post(routes::api_key))
        .route("/guidelines", get(routes::guidelines))
        .route("/documents", post(routes::upload_document))
        .route("/documents/reprocess", post(routes::reprocess_document))
        .route("/menu/selection", post(routes::menu_selection))
        .route("/analyze", post(routes::analyze))
        .route("/recommendations", post(routes::recommendations))
        .route("/healthz", get(routes::healthz))
        .route("/static/style.css", get(routes::stylesheet))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct WebUi {
    state: AppState,
    bind_address: String,
    max_upload_bytes: usize,
    session_ttl: Duration,
}

impl WebUi {
    pub fn new(
        state: AppState,
        bind_address: String,
        max_upload_bytes: usize,
        session_ttl: Duration,
    ) -> Self {
        Self {
            state,
            bind_address,
            max_upload_bytes,
            session_ttl,
        }
    }
}

#[async_trait::async_trait]
impl InputPort for WebUi {
    async fn run(&self) -> Result<(), DomainError> {
        let listener = TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| DomainError::Server(format!("bind {}: {}", self.bind_address, e)))?;
        info!(address = %self.bind_address, "web UI listening");

        let sweeper = spawn_session_sweeper(Arc::clone(&self.state.sessions), self.session_ttl);
        let app = router(self.state.clone(), self.max_upload_bytes);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();

        served.map_err(|e| DomainError::Server(e.to_string()))?;
        info!("web UI shut down");
        Ok(())
    }
}

/// Periodically drops sessions idle for longer than `ttl`.
fn spawn_session_sweeper(sessions: Arc<dyn SessionPort>, ttl: Duration) -> JoinHandle<()> {
    let period = SWEEP_INTERVAL.min(ttl).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // First tick fires immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sessions.purge_idle(ttl).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "purged idle sessions"),
                Err(e) => warn!(error = %e, "session purge failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Ctrl+C handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "terminate handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
