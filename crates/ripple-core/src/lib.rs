//! ripple-core: shared foundation for the Ripple impact analysis engine.
//!
//! - Errors: one `thiserror` enum per subsystem, each with a structured error code
//! - Config: TOML-based, layered resolution (env > project > user > defaults)
//! - Tracing: `tracing-subscriber` setup driven by `RIPPLE_LOG`
//! - Types: fast collections and arena identifiers
//! - Constants: traversal bounds and scoring defaults

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
