//! ORM configuration: named connections plus apps grouping model modules

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// App reserved for migration bookkeeping
pub const AERICH_APP: &str = "aerich";

/// Model module backing the reserved app
pub const AERICH_MODELS: &str = "aerich.models";

/// Connection every app uses unless told otherwise
pub const DEFAULT_CONNECTION: &str = "default";

/// Connection and app layout handed to the ORM at init
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrmConfig {
    /// Connection name -> database url
    #[serde(default)]
    pub connections: BTreeMap<String, String>,

    /// App name -> models and default connection
    #[serde(default)]
    pub apps: BTreeMap<String, AppConfig>,

    /// Create missing tables for every bound model during init
    #[serde(default)]
    pub generate_schemas: bool,
}

/// A named group of model modules sharing one connection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    pub models: Vec<String>,
    #[serde(default = "default_connection")]
    pub default_connection: String,
}

fn default_connection() -> String {
    DEFAULT_CONNECTION.to_string()
}

impl AppConfig {
    pub fn new(models: Vec<String>) -> Self {
        Self {
            models,
            default_connection: default_connection(),
        }
    }

    /// The reserved migration app
    pub fn aerich() -> Self {
        Self::new(vec![AERICH_MODELS.to_string()])
    }
}

impl OrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.connections.insert(name.into(), url.into());
        self
    }

    pub fn with_generate_schemas(mut self, enabled: bool) -> Self {
        self.generate_schemas = enabled;
        self
    }
}
