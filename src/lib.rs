//! reachout library entrypoint.
//!
//! Modules:
//! - `app`: startup, shared state, graceful shutdown
//! - `config`: environment-driven settings
//! - `http`: Axum router, handlers, and request gates
//! - `mail`: outbound notification and confirmation emails
//! - `db`: migrations and SQLite helpers
//! - `models`: typed records used across layers
//! - `util`: logging setup and small helpers

pub mod app;
pub mod config;
pub mod db;
pub mod http;
pub mod mail;
pub mod models;
pub mod util;
