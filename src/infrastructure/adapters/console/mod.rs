//! Console adapter for development/testing

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use crate::application::Bot;
use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::User;
use crate::infrastructure::config::ConsoleConfig;

/// Feeds lines from a reader to the bot and prints replies
pub struct ConsoleAdapter {
    chat_id: String,
    user: User,
}

impl ConsoleAdapter {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            chat_id: config.chat_id.clone(),
            user: User::new(config.user_id.clone()).with_username("console"),
        }
    }

    /// Handle one line of input, returning the reply to print
    pub fn handle_line(&self, bot: &Bot, line: &str) -> Result<Option<String>, BotError> {
        match bot.process_text(&self.chat_id, line, Some(self.user.clone())) {
            Err(BotError::Command(CommandError::NotFound(name))) => {
                Ok(Some(format!("Unknown command: {}", name)))
            }
            other => other,
        }
    }

    /// Serve until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&self, bot: &Bot, reader: R) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode), type 'quit' to exit");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" {
                break;
            }

            match self.handle_line(bot, line) {
                Ok(Some(reply)) => println!("[BOT] {}", reply),
                Ok(None) => {}
                Err(e) => tracing::warn!("Command failed: {}", e),
            }
        }
        Ok(())
    }
}
