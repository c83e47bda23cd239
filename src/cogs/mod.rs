//! Bundled cogs

pub mod example_cog;
