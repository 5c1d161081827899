//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dietician_ui::adapters::backend::{HttpBackend, MockBackend};
use dietician_ui::adapters::session::MemorySessionStore;
use dietician_ui::adapters::web::{AppState, WebUi};
use dietician_ui::ports::{BackendPort, InputPort, SessionPort};
use dietician_ui::shared::config::AppConfig;
use dietician_ui::usecases::{AuthService, DieticianService, DocumentService};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    let bind_address = cfg.bind_address();
    dietician_ui::adapters::ui::init_ui(&bind_address);

    // --- Backend: real HTTP client, or canned responses for offline UI work ---
    let backend_url = cfg.backend_url_or_default();
    let backend: Arc<dyn BackendPort> = if cfg.mock_backend {
        warn!("DIETICIAN_MOCK_BACKEND set, using mock backend (keys must start with fai_)");
        Arc::new(MockBackend::new())
    } else {
        info!(url = %backend_url, "using dietician backend");
        Arc::new(HttpBackend::new(backend_url.clone(), cfg.timeouts()))
    };

    let sessions: Arc<dyn SessionPort> = Arc::new(MemorySessionStore::new());

    // --- Services ---
    let poll_interval = cfg.poll_interval();
    let max_polls = cfg.max_polls_or_default();
    info!(
        poll_interval_secs = poll_interval.as_secs(),
        max_polls, "document job polling configured"
    );
    let state = AppState {
        auth: Arc::new(AuthService::new(Arc::clone(&backend))),
        dietician: Arc::new(DieticianService::new(Arc::clone(&backend))),
        documents: Arc::new(DocumentService::new(
            Arc::clone(&backend),
            poll_interval,
            max_polls,
        )),
        sessions,
        backend_url,
    };

    let input_port: Arc<dyn InputPort> = Arc::new(WebUi::new(
        state,
        bind_address,
        cfg.max_upload_bytes(),
        cfg.session_ttl(),
    ));

    // --- Run until Ctrl+C / SIGTERM ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
