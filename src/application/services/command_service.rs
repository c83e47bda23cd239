use crate::domain::entities::{Command, CommandRegistry, Message, Content};
use crate::application::errors::CommandError;

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        let name = command.name.clone();
        if let Some(previous) = self.registry.register(command) {
            tracing::warn!(
                "Command {} from {} replaced",
                name,
                previous.cog.as_deref().unwrap_or("the bot")
            );
        }
    }

    /// Remove every command contributed by `cog`
    pub fn remove_cog(&mut self, cog: &str) -> usize {
        self.registry.remove_cog(cog)
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("help [command]"));

        self.register(Command::new("version")
            .with_description("Show bot version")
            .with_handler(|_| {
                Ok(format!("cog-orm v{}", env!("CARGO_PKG_VERSION")))
            }));
    }

    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if cmd.name == "help" && cmd.handler.is_none() {
            return Ok(Some(self.get_help(args.first().map(String::as_str))));
        }

        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message.clone())?))
        } else {
            Ok(Some(format!("Command {} not implemented", cmd.name)))
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("{}{} - {}", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}{}", self.prefix, usage));
                }
                return help;
            }
            return format!("Command {}{} not found", self.prefix, name);
        }

        let mut commands: Vec<&Command> = self.registry.all().collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));

        let mut help = "Available commands:\n".to_string();
        for cmd in commands {
            help.push_str(&format!("  {}{} - {}\n", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }
}
