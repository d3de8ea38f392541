//! CLI command implementations.

pub mod packs;
pub mod settings;
pub mod version;
