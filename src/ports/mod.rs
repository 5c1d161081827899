//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by `main` to run the UI
//! - Outbound: Called by the application into the backend and session storage

pub mod inbound;
pub mod outbound;

pub use inbound::InputPort;
pub use outbound::{BackendPort, SessionPort, SharedSession};
