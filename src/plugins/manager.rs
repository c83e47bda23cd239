//! Cog manager - native cog registration

use crate::application::errors::PluginError;
use crate::plugins::trait_def::{Cog, CogInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Registry of loaded cogs keyed by name
#[derive(Default)]
pub struct CogManager {
    cogs: HashMap<String, Arc<dyn Cog>>,
}

impl CogManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cog.
    ///
    /// Fails when the name is taken unless `override_existing` is set, in
    /// which case the previous cog is unloaded and returned.
    pub fn add(&mut self, cog: Arc<dyn Cog>, override_existing: bool) -> Result<Option<Arc<dyn Cog>>, PluginError> {
        let name = cog.name().to_string();

        let replaced = match self.cogs.get(&name) {
            Some(_) if !override_existing => return Err(PluginError::DuplicateCog(name)),
            Some(_) => self.remove(&name),
            None => None,
        };

        info!("Registering cog: {} ({})", name, cog.module());
        self.cogs.insert(name, cog);
        Ok(replaced)
    }

    /// Unregister a cog, running its unload hook
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Cog>> {
        let cog = self.cogs.remove(name)?;
        cog.cog_unload();
        info!("Unregistered cog: {}", name);
        Some(cog)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Cog>> {
        self.cogs.get(name).cloned()
    }

    /// List all registered cogs, sorted by name
    pub fn list_cogs(&self) -> Vec<CogInfo> {
        let mut cogs: Vec<CogInfo> = self.cogs.values().map(|cog| {
            CogInfo {
                name: cog.name().to_string(),
                module: cog.module().to_string(),
                description: cog.description().to_string(),
            }
        }).collect();
        cogs.sort_by(|a, b| a.name.cmp(&b.name));
        cogs
    }

    pub fn len(&self) -> usize {
        self.cogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Dummy {
        name: &'static str,
        unloads: Arc<AtomicUsize>,
    }

    impl Cog for Dummy {
        fn name(&self) -> &str {
            self.name
        }

        fn module(&self) -> &str {
            "tests.dummy"
        }

        fn cog_unload(&self) {
            self.unloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn dummy(name: &'static str, unloads: &Arc<AtomicUsize>) -> Arc<dyn Cog> {
        Arc::new(Dummy { name, unloads: unloads.clone() })
    }

    #[test]
    fn test_duplicate_rejected_without_override() {
        let unloads = Arc::new(AtomicUsize::new(0));
        let mut manager = CogManager::new();
        manager.add(dummy("Stats", &unloads), false).unwrap();

        let err = manager.add(dummy("Stats", &unloads), false).err().unwrap();
        assert!(matches!(err, PluginError::DuplicateCog(ref n) if n == "Stats"));
        assert_eq!(unloads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_override_unloads_previous() {
        let unloads = Arc::new(AtomicUsize::new(0));
        let mut manager = CogManager::new();
        manager.add(dummy("Stats", &unloads), false).unwrap();

        let replaced = manager.add(dummy("Stats", &unloads), true).unwrap();
        assert!(replaced.is_some());
        assert_eq!(unloads.load(Ordering::SeqCst), 1);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_list_cogs_sorted() {
        let unloads = Arc::new(AtomicUsize::new(0));
        let mut manager = CogManager::new();
        manager.add(dummy("b", &unloads), false).unwrap();
        manager.add(dummy("a", &unloads), false).unwrap();

        let names: Vec<String> = manager.list_cogs().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
