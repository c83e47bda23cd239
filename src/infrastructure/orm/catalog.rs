//! Module catalog - Model modules addressable by dotted path

use std::collections::HashMap;
use std::sync::RwLock;
use crate::domain::traits::Model;
use crate::application::errors::OrmError;
use super::config::AERICH_MODELS;

/// Table definition captured from a [`Model`] type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    pub name: &'static str,
    pub table: &'static str,
    pub create_sql: String,
}

impl ModelSchema {
    pub fn of<M: Model>() -> Self {
        let full = std::any::type_name::<M>();
        Self {
            name: full.rsplit("::").next().unwrap_or(full),
            table: M::table_name(),
            create_sql: M::create_table_sql(),
        }
    }
}

/// A set of models published under one dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelModule {
    pub path: String,
    pub models: Vec<ModelSchema>,
}

impl ModelModule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            models: Vec::new(),
        }
    }

    pub fn with_model<M: Model>(mut self) -> Self {
        self.models.push(ModelSchema::of::<M>());
        self
    }
}

/// Registry answering "is there a model module at this path"
pub struct ModuleCatalog {
    modules: RwLock<HashMap<String, ModelModule>>,
}

impl ModuleCatalog {
    /// Empty catalog, without the migration models
    pub fn empty() -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Catalog holding the built-in `aerich.models` module
    pub fn new() -> Self {
        let catalog = Self::empty();
        let aerich = ModelModule::new(AERICH_MODELS).with_model::<Aerich>();
        catalog.modules
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(aerich.path.clone(), aerich);
        catalog
    }

    /// Publish a module, replacing any module already at its path
    pub fn register(&self, module: ModelModule) -> Result<(), OrmError> {
        let mut modules = self.modules.write()
            .map_err(|_| OrmError::Internal("Lock poisoned".to_string()))?;

        tracing::debug!("Registering model module {} ({} models)", module.path, module.models.len());
        modules.insert(module.path.clone(), module);
        Ok(())
    }

    /// Look up a module by absolute dotted path
    pub fn find_module(&self, path: &str) -> Option<ModelModule> {
        self.modules.read()
            .ok()?
            .get(path)
            .cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.modules.read()
            .ok()
            .map(|m| m.contains_key(path))
            .unwrap_or(false)
    }

    /// All registered paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.modules.read()
            .ok()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Migration history row kept by the schema migration tool
pub struct Aerich;

impl Model for Aerich {
    fn table_name() -> &'static str {
        "aerich"
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS \"aerich\" (
            \"id\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            \"version\" VARCHAR(255) NOT NULL,
            \"app\" VARCHAR(100) NOT NULL,
            \"content\" JSON NOT NULL
        )".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_catalog_has_aerich_models() {
        let catalog = ModuleCatalog::new();
        let module = catalog.find_module(AERICH_MODELS).unwrap();
        assert_eq!(module.models.len(), 1);
        assert_eq!(module.models[0].name, "Aerich");
        assert_eq!(module.models[0].table, "aerich");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = ModuleCatalog::empty();
        assert!(!catalog.contains(AERICH_MODELS));
        assert!(catalog.paths().is_empty());
    }

    #[test]
    fn test_register_replaces_module_at_same_path() {
        let catalog = ModuleCatalog::new();
        catalog.register(ModelModule::new("stats.models").with_model::<Aerich>()).unwrap();
        catalog.register(ModelModule::new("stats.models")).unwrap();

        assert!(catalog.find_module("stats.models").unwrap().models.is_empty());
        assert_eq!(catalog.paths(), vec!["aerich.models".to_string(), "stats.models".to_string()]);
    }
}
