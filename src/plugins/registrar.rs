//! Model registrar - binds a cog's declared model modules to the ORM

use tracing::debug;
use crate::application::errors::{BotError, PluginError};
use crate::infrastructure::orm::{resolve_name, ConnectionManager, ModuleCatalog};
use crate::plugins::trait_def::{Cog, ModelDecl};

/// Resolve declared model paths to absolute catalog paths.
///
/// Relative paths are anchored at `cog_module`. Every resolved path must be
/// published in `catalog`.
pub fn resolve_models(catalog: &ModuleCatalog, cog_module: &str, models: ModelDecl) -> Result<Vec<String>, PluginError> {
    let mut module_paths = Vec::new();

    for model in models.into_paths() {
        let name = resolve_name(&model, cog_module)?;

        if !catalog.contains(&name) {
            return Err(PluginError::ModuleNotFound(name));
        }

        debug!("Resolved model path '{}' to '{}'", model, name);
        module_paths.push(name);
    }

    Ok(module_paths)
}

/// Register the models declared by `cog` as an app named after it.
///
/// Nothing is written unless every path resolves; no declarations means no
/// ORM interaction at all.
pub fn register_models(orm: &ConnectionManager, cog: &dyn Cog, models: Option<ModelDecl>) -> Result<(), BotError> {
    let Some(models) = models else {
        return Ok(());
    };

    let module_paths = resolve_models(orm.catalog(), cog.module(), models)?;
    if module_paths.is_empty() {
        return Ok(());
    }

    orm.add_app(cog.name(), module_paths)?;
    Ok(())
}
