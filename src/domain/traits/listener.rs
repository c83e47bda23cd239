use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::domain::entities::Event;

/// Event listener subscribed to bot lifecycle events
#[async_trait]
pub trait Listener: Send + Sync {
    /// Handle a dispatched event. Errors abort the dispatch and reach the caller.
    async fn on_event(&self, event: &Event) -> Result<(), BotError>;
}
