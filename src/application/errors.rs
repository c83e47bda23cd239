//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("ORM error: {0}")]
    Orm(#[from] OrmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Cog registration and model resolution errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Cog '{0}' is already loaded")]
    DuplicateCog(String),

    #[error("Module '{0}' could not be loaded.")]
    ModuleNotFound(String),

    #[error("Relative path '{name}' goes beyond the top-level package of '{package}'")]
    BeyondTopLevel { name: String, package: String },
}

/// ORM lifecycle errors
#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("App '{0}' is reserved for migration bookkeeping")]
    ReservedApp(String),

    #[error("App '{app}' uses unknown connection '{connection}'")]
    UnknownConnection { app: String, connection: String },

    #[error("Unsupported database url: {0}")]
    UnsupportedScheme(String),

    #[error("Model module '{0}' is not registered")]
    ModuleNotFound(String),

    #[error("App '{0}' is not registered")]
    UnknownApp(String),

    #[error("Connection '{0}' is not open")]
    NotConnected(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
