/// Lifecycle events emitted by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Gateway handshake finished
    Connect,
    /// All cogs loaded and the bot is serving
    Ready,
    /// Connection is being torn down
    Disconnect,
}

/// Key used to subscribe listeners to an [`Event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Ready,
    Disconnect,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Connect => EventKind::Connect,
            Event::Ready => EventKind::Ready,
            Event::Disconnect => EventKind::Disconnect,
        }
    }
}

impl EventKind {
    /// Listener name as used in logs (`on_connect`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "on_connect",
            EventKind::Ready => "on_ready",
            EventKind::Disconnect => "on_disconnect",
        }
    }
}
