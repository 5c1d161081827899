//! Cross-cutting pieces shared by every layer.

pub mod config;
