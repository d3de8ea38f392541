mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("xmn=info,xmn_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Packs { json } => commands::packs::run(&args.root, json),
        Command::Version { left, right } => commands::version::run(&left, &right),
        Command::Settings { pack } => commands::settings::run(&args.root, &pack),
    }
}
