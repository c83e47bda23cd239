//! Cog system
//!
//! Cogs bundle commands and may declare ORM model modules. Native
//! registration lives in [`CogManager`]; [`registrar`] adds the model step.

pub mod manager;
pub mod registrar;
pub mod trait_def;

pub use manager::CogManager;
pub use trait_def::{Cog, CogInfo, ModelDecl};
