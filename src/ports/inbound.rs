//! Inbound port. `main` hands control to the UI adapter through this.

use crate::domain::DomainError;

/// Input port: the UI serves users until shutdown.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Serve the UI. Returns after a graceful shutdown.
    async fn run(&self) -> Result<(), DomainError>;
}
