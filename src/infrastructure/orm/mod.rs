//! ORM shim - app configuration, model modules and the connection lifecycle
//!
//! Cogs declare model modules by dotted path. Paths are resolved against the
//! [`ModuleCatalog`] and grouped into apps on the [`ConnectionManager`], which
//! opens connections and binds models the first time the bot connects.

pub mod catalog;
pub mod config;
pub mod manager;
pub mod resolve;

pub use catalog::{ModelModule, ModelSchema, ModuleCatalog};
pub use config::{AppConfig, OrmConfig, AERICH_APP, AERICH_MODELS, DEFAULT_CONNECTION};
pub use manager::{ConnectionManager, ModelBinding};
pub use resolve::resolve_name;
