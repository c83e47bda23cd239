//! Message handling - Parsing raw text into messages

pub mod parser;

pub use parser::MessageParser;
