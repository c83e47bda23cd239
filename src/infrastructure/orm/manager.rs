//! Connection manager - lazy ORM initialization on the connect event

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::application::errors::{BotError, OrmError};
use crate::domain::entities::Event;
use crate::domain::traits::Listener;
use crate::infrastructure::database::Database;
use super::catalog::ModuleCatalog;
use super::config::{AppConfig, OrmConfig, AERICH_APP};

/// A model bound to an app and its connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    pub app: String,
    pub module: String,
    pub model: &'static str,
    pub table: &'static str,
    pub connection: String,
}

struct BoundModel {
    binding: ModelBinding,
    create_sql: String,
}

/// Owns the ORM configuration and the connections opened from it
pub struct ConnectionManager {
    config: RwLock<OrmConfig>,
    catalog: Arc<ModuleCatalog>,
    initialized: AtomicBool,
    initializations: AtomicUsize,
    init_lock: tokio::sync::Mutex<()>,
    connections: Mutex<HashMap<String, Database>>,
    bound: RwLock<Vec<BoundModel>>,
}

fn poisoned<T>(_: T) -> OrmError {
    OrmError::Internal("Lock poisoned".to_string())
}

impl ConnectionManager {
    /// Create a manager with the built-in module catalog
    pub fn new(config: OrmConfig) -> Self {
        Self::with_catalog(config, Arc::new(ModuleCatalog::new()))
    }

    /// Create a manager resolving model modules against `catalog`.
    ///
    /// The apps of `config` are replaced by the reserved migration app; apps
    /// are added afterwards by cogs declaring models.
    pub fn with_catalog(mut config: OrmConfig, catalog: Arc<ModuleCatalog>) -> Self {
        if !config.apps.is_empty() {
            let dropped: Vec<&String> = config.apps.keys().collect();
            warn!("Ignoring apps from configuration: {:?}", dropped);
        }

        config.apps = BTreeMap::new();
        config.apps.insert(AERICH_APP.to_string(), AppConfig::aerich());

        Self {
            config: RwLock::new(config),
            catalog,
            initialized: AtomicBool::new(false),
            initializations: AtomicUsize::new(0),
            init_lock: tokio::sync::Mutex::new(()),
            connections: Mutex::new(HashMap::new()),
            bound: RwLock::new(Vec::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<ModuleCatalog> {
        &self.catalog
    }

    /// Register `models` under `app_name`, replacing any previous entry.
    ///
    /// Once the ORM is initialized the app is bound on the spot; if binding
    /// fails nothing is registered.
    pub fn add_app(&self, app_name: &str, models: Vec<String>) -> Result<(), OrmError> {
        if app_name == AERICH_APP {
            return Err(OrmError::ReservedApp(app_name.to_string()));
        }

        let app = AppConfig::new(models);
        if self.is_initialized() {
            self.bind_late(app_name, &app)?;
        }

        let mut config = self.config.write().map_err(poisoned)?;
        info!("Registering app '{}' with models {:?}", app_name, app.models);
        config.apps.insert(app_name.to_string(), app);
        Ok(())
    }

    /// Initialize the ORM unless a previous connect already did.
    ///
    /// A failed init leaves the manager uninitialized.
    pub async fn on_connect(&self) -> Result<(), OrmError> {
        let _guard = self.init_lock.lock().await;

        if self.is_initialized() {
            debug!("ORM already initialized, skipping");
            return Ok(());
        }

        self.init()?;
        self.initialized.store(true, Ordering::SeqCst);
        self.initializations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn init(&self) -> Result<(), OrmError> {
        let config = self.config()?;
        info!(
            "Initializing ORM: {} connections, {} apps",
            config.connections.len(),
            config.apps.len()
        );

        let mut bound = Vec::new();
        for (app_name, app) in &config.apps {
            bound.extend(self.bind_app(app_name, app, &config)?);
        }

        let mut opened = HashMap::new();
        for (name, url) in &config.connections {
            debug!("Opening connection '{}' ({})", name, url);
            let db = Database::open(url)?;
            if config.generate_schemas {
                generate_schemas(&db, name, &bound)?;
            }
            opened.insert(name.clone(), db);
        }

        info!("ORM initialized with {} models", bound.len());

        *self.connections.lock().map_err(poisoned)? = opened;
        *self.bound.write().map_err(poisoned)? = bound;
        Ok(())
    }

    /// Look up every model module of `app` and check its connection exists
    fn bind_app(&self, app_name: &str, app: &AppConfig, config: &OrmConfig) -> Result<Vec<BoundModel>, OrmError> {
        if !config.connections.contains_key(&app.default_connection) {
            return Err(OrmError::UnknownConnection {
                app: app_name.to_string(),
                connection: app.default_connection.clone(),
            });
        }

        let mut bound = Vec::new();
        for path in &app.models {
            let module = self.catalog
                .find_module(path)
                .ok_or_else(|| OrmError::ModuleNotFound(path.clone()))?;

            for schema in module.models {
                bound.push(BoundModel {
                    binding: ModelBinding {
                        app: app_name.to_string(),
                        module: path.clone(),
                        model: schema.name,
                        table: schema.table,
                        connection: app.default_connection.clone(),
                    },
                    create_sql: schema.create_sql,
                });
            }
        }
        Ok(bound)
    }

    /// Bind an app registered after init, replacing its previous models
    fn bind_late(&self, app_name: &str, app: &AppConfig) -> Result<(), OrmError> {
        let config = self.config()?;
        let bound = self.bind_app(app_name, app, &config)?;

        if config.generate_schemas {
            self.with_open(&app.default_connection, |db| {
                generate_schemas(db, &app.default_connection, &bound)
            })?;
        }

        info!("Bound app '{}' after init ({} models)", app_name, bound.len());
        let mut all = self.bound.write().map_err(poisoned)?;
        all.retain(|m| m.binding.app != app_name);
        all.extend(bound);
        Ok(())
    }

    /// Close every open connection.
    ///
    /// The manager stays initialized; connections reopen on next use.
    pub fn close(&self) -> Result<(), OrmError> {
        let mut connections = self.connections.lock().map_err(poisoned)?;

        if !connections.is_empty() {
            info!("Closing {} ORM connections", connections.len());
        }
        connections.clear();
        Ok(())
    }

    /// Run `f` against the default connection of `app`
    pub fn with_connection<T, F>(&self, app: &str, f: F) -> Result<T, OrmError>
    where
        F: FnOnce(&Database) -> Result<T, OrmError>,
    {
        let connection = self.app(app)?
            .ok_or_else(|| OrmError::UnknownApp(app.to_string()))?
            .default_connection;

        self.with_open(&connection, f)
    }

    /// Run `f` against connection `name`, reopening it if it was closed
    fn with_open<T, F>(&self, name: &str, f: F) -> Result<T, OrmError>
    where
        F: FnOnce(&Database) -> Result<T, OrmError>,
    {
        let mut connections = self.connections.lock().map_err(poisoned)?;

        if !connections.contains_key(name) {
            if !self.is_initialized() {
                return Err(OrmError::NotConnected(name.to_string()));
            }
            connections.insert(name.to_string(), self.reopen(name)?);
        }

        let db = connections
            .get(name)
            .ok_or_else(|| OrmError::NotConnected(name.to_string()))?;
        f(db)
    }

    fn reopen(&self, name: &str) -> Result<Database, OrmError> {
        let config = self.config()?;
        let url = config.connections
            .get(name)
            .ok_or_else(|| OrmError::NotConnected(name.to_string()))?;

        info!("Reopening connection '{}'", name);
        let db = Database::open(url)?;
        if config.generate_schemas {
            let bound = self.bound.read().map_err(poisoned)?;
            generate_schemas(&db, name, &bound)?;
        }
        Ok(db)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Number of successful initializations over the process lifetime
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Result<OrmConfig, OrmError> {
        self.config.read()
            .map(|c| c.clone())
            .map_err(poisoned)
    }

    pub fn app(&self, name: &str) -> Result<Option<AppConfig>, OrmError> {
        let config = self.config.read().map_err(poisoned)?;
        Ok(config.apps.get(name).cloned())
    }

    /// Registered app names, sorted
    pub fn apps(&self) -> Vec<String> {
        self.config.read()
            .ok()
            .map(|c| c.apps.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Models currently bound to a connection
    pub fn bindings(&self) -> Vec<ModelBinding> {
        self.bound.read()
            .ok()
            .map(|b| b.iter().map(|m| m.binding.clone()).collect())
            .unwrap_or_default()
    }
}

/// Create the tables of every model bound to `connection`
fn generate_schemas(db: &Database, connection: &str, bound: &[BoundModel]) -> Result<(), OrmError> {
    for model in bound.iter().filter(|m| m.binding.connection == connection) {
        debug!("Creating table {} for {}.{}", model.binding.table, model.binding.app, model.binding.model);
        db.execute_batch(&model.create_sql)?;
    }
    Ok(())
}

#[async_trait]
impl Listener for ConnectionManager {
    async fn on_event(&self, event: &Event) -> Result<(), BotError> {
        if *event == Event::Connect {
            self.on_connect().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::orm::catalog::{Aerich, ModelModule};
    use crate::infrastructure::orm::config::AERICH_MODELS;

    fn memory_config() -> OrmConfig {
        OrmConfig::new()
            .with_connection("default", "sqlite://:memory:")
            .with_generate_schemas(true)
    }

    #[test]
    fn test_new_injects_reserved_app() {
        let manager = ConnectionManager::new(OrmConfig::new());
        let aerich = manager.app(AERICH_APP).unwrap().unwrap();
        assert_eq!(aerich.models, vec![AERICH_MODELS.to_string()]);
        assert_eq!(manager.apps(), vec![AERICH_APP.to_string()]);
        assert!(!manager.is_initialized());
    }

    #[test]
    fn test_new_drops_configured_apps() {
        let mut config = OrmConfig::new();
        config.apps.insert("stale".to_string(), AppConfig::new(vec!["stale.models".to_string()]));

        let manager = ConnectionManager::new(config);
        assert!(manager.app("stale").unwrap().is_none());
    }

    #[test]
    fn test_add_app_rejects_reserved_name() {
        let manager = ConnectionManager::new(OrmConfig::new());
        let err = manager.add_app(AERICH_APP, vec!["x.models".to_string()]).unwrap_err();
        assert!(matches!(err, OrmError::ReservedApp(_)));
        assert_eq!(manager.app(AERICH_APP).unwrap().unwrap(), AppConfig::aerich());
    }

    #[tokio::test]
    async fn test_on_connect_creates_aerich_table() {
        let manager = ConnectionManager::new(memory_config());
        manager.on_connect().await.unwrap();

        assert!(manager.is_initialized());
        let exists = manager
            .with_connection(AERICH_APP, |db| db.table_exists("aerich"))
            .unwrap();
        assert!(exists);
        assert_eq!(manager.bindings().len(), 1);
        assert_eq!(manager.bindings()[0].model, "Aerich");
    }

    #[tokio::test]
    async fn test_on_connect_twice_initializes_once() {
        let manager = ConnectionManager::new(memory_config());
        manager.on_connect().await.unwrap();
        manager.on_connect().await.unwrap();
        assert_eq!(manager.initializations(), 1);
    }

    #[tokio::test]
    async fn test_missing_connection_fails_and_stays_uninitialized() {
        let manager = ConnectionManager::new(OrmConfig::new());
        let err = manager.on_connect().await.unwrap_err();

        assert!(matches!(err, OrmError::UnknownConnection { .. }));
        assert!(!manager.is_initialized());
        assert_eq!(manager.initializations(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_module_fails_init() {
        let manager = ConnectionManager::new(memory_config());
        manager.add_app("Ghost", vec!["ghost.models".to_string()]).unwrap();

        let err = manager.on_connect().await.unwrap_err();
        assert!(matches!(err, OrmError::ModuleNotFound(ref p) if p == "ghost.models"));
    }

    #[test]
    fn test_with_connection_before_connect() {
        let manager = ConnectionManager::new(memory_config());
        let err = manager.with_connection(AERICH_APP, |_| Ok(())).unwrap_err();
        assert!(matches!(err, OrmError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_close_then_reconnect_reopens_connection() {
        let manager = ConnectionManager::new(memory_config());
        manager.on_connect().await.unwrap();
        manager.close().unwrap();
        manager.on_connect().await.unwrap();

        let exists = manager
            .with_connection(AERICH_APP, |db| db.table_exists("aerich"))
            .unwrap();
        assert!(exists);
        assert_eq!(manager.initializations(), 1);
    }

    #[tokio::test]
    async fn test_late_app_is_bound_immediately() {
        let catalog = Arc::new(ModuleCatalog::new());
        catalog.register(ModelModule::new("late.models").with_model::<Aerich>()).unwrap();
        let manager = ConnectionManager::with_catalog(memory_config(), catalog);
        manager.on_connect().await.unwrap();

        manager.add_app("Late", vec!["late.models".to_string()]).unwrap();

        let apps: Vec<String> = manager.bindings().into_iter().map(|b| b.app).collect();
        assert_eq!(apps, vec![AERICH_APP.to_string(), "Late".to_string()]);
        assert!(manager.with_connection("Late", |db| db.table_exists("aerich")).unwrap());
    }

    #[tokio::test]
    async fn test_late_app_with_missing_module_is_not_registered() {
        let manager = ConnectionManager::new(memory_config());
        manager.on_connect().await.unwrap();

        let err = manager.add_app("Ghost", vec!["ghost.models".to_string()]).unwrap_err();
        assert!(matches!(err, OrmError::ModuleNotFound(_)));
        assert!(manager.app("Ghost").unwrap().is_none());
        assert_eq!(manager.bindings().len(), 1);
    }
}
