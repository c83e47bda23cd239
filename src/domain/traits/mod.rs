//! Domain traits - Abstractions for infrastructure implementations

pub mod listener;
pub mod model;

pub use listener::Listener;
pub use model::Model;
