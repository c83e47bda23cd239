//! cog-orm - ORM model registration for bot cogs
//!
//! Cogs declare the model modules they own when they are added to the
//! [`Bot`]; the [`ConnectionManager`] groups them into apps and opens the
//! database the first time the bot connects.

pub mod application;
pub mod cogs;
pub mod domain;
pub mod infrastructure;
pub mod plugins;

pub use application::Bot;
pub use application::errors::{BotError, OrmError, PluginError};
pub use infrastructure::orm::{ConnectionManager, ModuleCatalog, OrmConfig};
pub use plugins::{Cog, ModelDecl};
