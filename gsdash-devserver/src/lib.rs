//! gsdash development server library.
//!
//! Exposes the in-memory task server for use in tests and embedding.
//! It answers the same HTTP API as the real grid-search task server,
//! without executing any task.

pub mod config;
pub mod server;
pub mod store;
