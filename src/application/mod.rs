//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Bot: Cog host and event dispatch
//! - Services: Command registration and execution
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod bot;
pub mod errors;
pub mod services;
pub mod messaging;

pub use bot::Bot;
