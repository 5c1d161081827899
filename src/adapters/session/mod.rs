//! Session storage adapters. Implement SessionPort.

pub mod memory;

pub use memory::MemorySessionStore;
