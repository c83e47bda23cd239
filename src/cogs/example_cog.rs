//! Example cog: counts `example` invocations per user in the database

use chrono::{DateTime, Utc};
use rusqlite::params;
use std::sync::Arc;

use crate::application::errors::{BotError, CommandError, OrmError};
use crate::application::Bot;
use crate::domain::entities::Command;
use crate::domain::traits::Model;
use crate::infrastructure::database::Database;
use crate::infrastructure::orm::{ConnectionManager, ModelModule};
use crate::plugins::Cog;

/// Dotted path the example's models are published under
pub const MODULE: &str = "example.example_cog";

pub struct ExampleCounter {
    pub id: i64,
    pub user: i64,
    pub time: DateTime<Utc>,
}

impl Model for ExampleCounter {
    fn table_name() -> &'static str {
        "example_counter"
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS \"example_counter\" (
            \"id\" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            \"user\" BIGINT NOT NULL,
            \"time\" TIMESTAMP NOT NULL
        )".to_string()
    }
}

impl ExampleCounter {
    pub fn create(db: &Database, user: i64, time: DateTime<Utc>) -> Result<Self, OrmError> {
        db.conn().execute(
            "INSERT INTO example_counter (user, time) VALUES (?1, ?2)",
            params![user, time.to_rfc3339()],
        )?;
        Ok(Self {
            id: db.conn().last_insert_rowid(),
            user,
            time,
        })
    }

    pub fn count_for(db: &Database, user: i64) -> Result<i64, OrmError> {
        let count = db.conn().query_row(
            "SELECT COUNT(*) FROM example_counter WHERE user = ?1",
            [user],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub struct Example {
    orm: Arc<ConnectionManager>,
}

impl Example {
    pub fn new(orm: Arc<ConnectionManager>) -> Self {
        Self { orm }
    }
}

impl Cog for Example {
    fn name(&self) -> &str {
        "Example"
    }

    fn module(&self) -> &str {
        MODULE
    }

    fn description(&self) -> &str {
        "Says hello and remembers who asked"
    }

    fn commands(&self) -> Vec<Command> {
        let orm = self.orm.clone();
        let app = self.name().to_string();

        vec![Command::new("example")
            .with_description("Say hello")
            .with_handler(move |msg| {
                let user = msg.sender_id()
                    .ok_or_else(|| CommandError::ExecutionFailed("Sender has no numeric id".to_string()))?;
                orm.with_connection(&app, |db| ExampleCounter::create(db, user, Utc::now()))
                    .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;
                Ok("Hello!".to_string())
            })]
    }
}

/// Publish the example models and load the cog
pub fn setup(bot: &mut Bot) -> Result<(), BotError> {
    bot.catalog().register(ModelModule::new(MODULE).with_model::<ExampleCounter>())?;
    let cog = Example::new(bot.orm().clone());
    bot.add_cog(cog, false, Some(".".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::infrastructure::orm::OrmConfig;

    async fn connected_bot() -> Bot {
        let config = OrmConfig::new()
            .with_connection("default", "sqlite://:memory:")
            .with_generate_schemas(true);
        let mut bot = Bot::new("!", config);
        setup(&mut bot).unwrap();
        bot.connect().await.unwrap();
        bot
    }

    #[tokio::test]
    async fn test_example_requires_numeric_sender() {
        let bot = connected_bot().await;

        let anonymous = bot.process_text("chat", "!example", None);
        assert!(matches!(anonymous, Err(BotError::Command(CommandError::ExecutionFailed(_)))));

        let named = bot.process_text("chat", "!example", Some(User::new("someone")));
        assert!(matches!(named, Err(BotError::Command(CommandError::ExecutionFailed(_)))));

        let count = bot.orm()
            .with_connection("Example", |db| db.count_rows(ExampleCounter::table_name()))
            .unwrap();
        assert_eq!(count, 0);
    }
}
