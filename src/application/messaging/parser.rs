//! Message parser - Turns raw text into structured messages

use crate::domain::entities::{Message, Content, User};

/// Parses incoming text into Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        let command = (!self.command_prefix.is_empty())
            .then(|| text.strip_prefix(self.command_prefix.as_str()))
            .flatten()
            .map(Self::parse_command);
        let content = command.unwrap_or_else(|| Content::Text(text));

        Message::new(chat_id, content).with_sender_opt(sender)
    }

    fn parse_command(cmd_text: &str) -> Content {
        let mut parts = cmd_text.split_whitespace();
        match parts.next() {
            Some(name) => Content::Command {
                name: name.to_string(),
                args: parts.map(str::to_string).collect(),
            },
            None => Content::Empty,
        }
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MessageType;

    #[test]
    fn test_parse_command_with_args() {
        let parser = MessageParser::new("!");
        let msg = parser.parse("chat", "!help example", None);
        assert_eq!(msg.content, Content::Command {
            name: "help".to_string(),
            args: vec!["example".to_string()],
        });
        assert_eq!(msg.message_type, MessageType::Command);
    }

    #[test]
    fn test_parse_plain_text() {
        let parser = MessageParser::new("!");
        let msg = parser.parse("chat", "hello there", Some(User::new("42")));
        assert_eq!(msg.content.text(), Some("hello there"));
        assert_eq!(msg.sender_id(), Some(42));
    }

    #[test]
    fn test_bare_prefix_is_empty() {
        let parser = MessageParser::new("!");
        assert_eq!(parser.parse("chat", "!", None).content, Content::Empty);
    }
}
