//! Domain layer - Core types shared by the bot and the ORM shim
//!
//! This layer contains:
//! - Entities: Messages, commands, users, lifecycle events
//! - Traits: Abstractions implemented elsewhere (Listener, Model)

pub mod entities;
pub mod traits;
