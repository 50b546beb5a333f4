//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{CleanCmd, ConfigCmd, IndexCmd, SearchCmd};

#[derive(Parser)]
#[command(name = "gist")]
#[command(about = "Gist - polyglot semantic code search")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rebuild the index for a directory
    Index(IndexCmd),

    /// Search indexed code blocks
    Search(SearchCmd),

    /// Delete the .gist directory
    Clean(CleanCmd),

    /// Manage configuration (API keys, etc.)
    Config(ConfigCmd),
}

impl Command {
    pub async fn execute(&self) -> anyhow::Result<()> {
        match self {
            Command::Index(cmd) => cmd.run().await,
            Command::Search(cmd) => cmd.run().await,
            Command::Clean(cmd) => cmd.run().await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}
