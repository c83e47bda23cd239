//! Cog trait definitions

use crate::domain::entities::Command;

/// A self-contained bundle of commands registered into the bot
pub trait Cog: Send + Sync {
    /// Unique name of the cog, also used as its ORM app name
    fn name(&self) -> &str;

    /// Dotted path of the module that defines the cog; anchors relative model paths
    fn module(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Commands contributed by the cog
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    /// Optional: Cleanup when the cog is removed or replaced
    fn cog_unload(&self) {}
}

/// Model modules declared by a cog: a single path or a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDecl {
    One(String),
    Many(Vec<String>),
}

impl ModelDecl {
    pub fn into_paths(self) -> Vec<String> {
        match self {
            ModelDecl::One(path) => vec![path],
            ModelDecl::Many(paths) => paths,
        }
    }
}

impl From<&str> for ModelDecl {
    fn from(path: &str) -> Self {
        ModelDecl::One(path.to_string())
    }
}

impl From<String> for ModelDecl {
    fn from(path: String) -> Self {
        ModelDecl::One(path)
    }
}

impl From<Vec<String>> for ModelDecl {
    fn from(paths: Vec<String>) -> Self {
        ModelDecl::Many(paths)
    }
}

impl From<Vec<&str>> for ModelDecl {
    fn from(paths: Vec<&str>) -> Self {
        ModelDecl::Many(paths.into_iter().map(String::from).collect())
    }
}

/// Cog information for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CogInfo {
    pub name: String,
    pub module: String,
    pub description: String,
}
