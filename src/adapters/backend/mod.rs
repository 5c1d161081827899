//! Backend adapters. Implement BackendPort for the dietician HTTP API.
//!
//! Provides the reqwest adapter and a mock adapter for offline runs.

pub mod http_adapter;
pub mod mock_adapter;

pub use http_adapter::HttpBackend;
pub use mock_adapter::MockBackend;
