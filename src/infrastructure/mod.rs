//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite connections
//! - ORM: App configuration, model modules, connection lifecycle
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod database;
pub mod orm;
pub mod adapters;
