//! Word-guessing game server library.
//!
//! Exposes the HTTP API, configuration, and logging setup used by the
//! `sw_server` and `import_words` binaries and by the integration tests.

pub mod api;
pub mod config;
pub mod logging;
