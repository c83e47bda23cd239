//! Bot - cog host wired to the ORM connection lifecycle

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::errors::{BotError, PluginError};
use crate::application::messaging::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Event, EventKind, User};
use crate::domain::traits::Listener;
use crate::infrastructure::orm::{ConnectionManager, ModuleCatalog, OrmConfig};
use crate::plugins::registrar;
use crate::plugins::{Cog, CogInfo, CogManager, ModelDecl};

/// Chat bot hosting cogs whose models live in the ORM
pub struct Bot {
    commands: CommandService,
    parser: MessageParser,
    cogs: CogManager,
    listeners: HashMap<EventKind, Vec<Arc<dyn Listener>>>,
    orm: Arc<ConnectionManager>,
}

impl Bot {
    /// Create a bot owning a fresh connection manager built from `orm_config`
    pub fn new(prefix: impl Into<String>, orm_config: OrmConfig) -> Self {
        Self::with_manager(prefix, Arc::new(ConnectionManager::new(orm_config)))
    }

    /// Create a bot around an existing connection manager.
    ///
    /// The manager is subscribed to the connect event.
    pub fn with_manager(prefix: impl Into<String>, orm: Arc<ConnectionManager>) -> Self {
        let prefix = prefix.into();
        let mut commands = CommandService::new(prefix.clone());
        commands.register_defaults();

        let mut bot = Self {
            commands,
            parser: MessageParser::new(prefix),
            cogs: CogManager::new(),
            listeners: HashMap::new(),
            orm: orm.clone(),
        };
        bot.add_listener(EventKind::Connect, orm);
        bot
    }

    pub fn orm(&self) -> &Arc<ConnectionManager> {
        &self.orm
    }

    pub fn catalog(&self) -> &Arc<ModuleCatalog> {
        self.orm.catalog()
    }

    pub fn add_listener(&mut self, kind: EventKind, listener: Arc<dyn Listener>) {
        debug!("Adding {} listener", kind.as_str());
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Run every listener subscribed to `event`, in subscription order.
    ///
    /// The first failing listener aborts the dispatch.
    pub async fn dispatch(&self, event: Event) -> Result<(), BotError> {
        let Some(listeners) = self.listeners.get(&event.kind()) else {
            return Ok(());
        };

        debug!("Dispatching {} to {} listeners", event.kind().as_str(), listeners.len());
        for listener in listeners {
            listener.on_event(&event).await?;
        }
        Ok(())
    }

    /// Signal that the gateway connection is up
    pub async fn connect(&self) -> Result<(), BotError> {
        info!("Connected, {} cogs loaded", self.cogs.len());
        self.dispatch(Event::Connect).await?;
        self.dispatch(Event::Ready).await
    }

    /// Signal disconnect and close ORM connections
    pub async fn close(&self) -> Result<(), BotError> {
        self.dispatch(Event::Disconnect).await?;
        self.orm.close()?;
        info!("Bot closed");
        Ok(())
    }

    /// Native cog registration: the cog and its commands, nothing else
    pub fn register_cog(&mut self, cog: Arc<dyn Cog>, override_existing: bool) -> Result<(), PluginError> {
        if let Some(previous) = self.cogs.add(cog.clone(), override_existing)? {
            self.commands.remove_cog(previous.name());
        }

        for command in cog.commands() {
            self.commands.register(command.with_cog(cog.name()));
        }
        Ok(())
    }

    /// Register a cog, then bind its declared model modules to the ORM.
    ///
    /// The cog stays registered when model resolution fails; no app entry is
    /// written in that case.
    pub fn add_cog<C: Cog + 'static>(&mut self, cog: C, override_existing: bool, models: Option<ModelDecl>) -> Result<(), BotError> {
        let cog: Arc<dyn Cog> = Arc::new(cog);
        self.register_cog(cog.clone(), override_existing)?;
        registrar::register_models(&self.orm, cog.as_ref(), models)
    }

    /// Unregister a cog and its commands. The ORM app entry is kept.
    pub fn remove_cog(&mut self, name: &str) -> bool {
        match self.cogs.remove(name) {
            Some(_) => {
                self.commands.remove_cog(name);
                true
            }
            None => false,
        }
    }

    pub fn cog(&self, name: &str) -> Option<Arc<dyn Cog>> {
        self.cogs.get(name)
    }

    pub fn cogs(&self) -> Vec<CogInfo> {
        self.cogs.list_cogs()
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Parse a line of text and run the matching command
    pub fn process_text(&self, chat_id: &str, text: &str, sender: Option<User>) -> Result<Option<String>, BotError> {
        let message = self.parser.parse(chat_id, text, sender);
        Ok(self.commands.handle(&message)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    #[async_trait]
    impl Listener for Counter {
        async fn on_event(&self, _event: &Event) -> Result<(), BotError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn memory_config() -> OrmConfig {
        OrmConfig::new().with_connection("default", "sqlite://:memory:")
    }

    #[tokio::test]
    async fn test_connect_dispatches_connect_and_ready() {
        let mut bot = Bot::new("!", memory_config());
        let connect = Arc::new(Counter(AtomicUsize::new(0)));
        let ready = Arc::new(Counter(AtomicUsize::new(0)));
        bot.add_listener(EventKind::Connect, connect.clone());
        bot.add_listener(EventKind::Ready, ready.clone());

        bot.connect().await.unwrap();

        assert_eq!(connect.0.load(Ordering::SeqCst), 1);
        assert_eq!(ready.0.load(Ordering::SeqCst), 1);
        assert!(bot.orm().is_initialized());
    }

    #[tokio::test]
    async fn test_connect_propagates_orm_failure() {
        let bot = Bot::new("!", OrmConfig::new());
        let err = bot.connect().await.unwrap_err();
        assert!(matches!(err, BotError::Orm(_)));
    }

    #[test]
    fn test_version_command() {
        let bot = Bot::new("!", memory_config());
        let reply = bot.process_text("chat", "!version", None).unwrap().unwrap();
        assert!(reply.starts_with("cog-orm v"));
    }
}
