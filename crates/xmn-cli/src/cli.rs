//! CLI argument definitions for xmn.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xmn")]
#[command(about = "Mod pack and settings helper", version)]
pub struct Args {
    /// Directory containing one subdirectory per pack
    #[arg(long, env = "XMN_PACKS_ROOT", default_value = "mods")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List enabled packs
    Packs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare two version strings
    Version {
        /// Left-hand version (e.g., 0.91.3)
        left: String,
        /// Right-hand version
        right: String,
    },
    /// Show the settings document of a pack
    Settings {
        /// Pack name as declared in its manifest
        pack: String,
    },
}
