//! Infrastructure adapters. Implement the ports.
//!
//! Backend HTTP client, session storage, the web UI and console output. Map errors to DomainError.

pub mod backend;
pub mod session;
pub mod ui;
pub mod web;
