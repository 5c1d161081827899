//! dietician-ui: web front end for the Singapore AI Dietician backend, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
