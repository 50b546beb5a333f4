//! Clean command - remove the .gist directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::store;

#[derive(Args)]
pub struct CleanCmd {
    /// Root directory whose index should be removed
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl CleanCmd {
    pub async fn run(&self) -> Result<()> {
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("cannot resolve root directory {}", self.root.display()))?;

        let gist_dir = store::gist_dir(&root);
        if !gist_dir.exists() {
            println!("No .gist directory found.");
            return Ok(());
        }

        if !self.yes {
            println!("This will delete: {}", gist_dir.display());
            print!("Continue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Aborted.");
                return Ok(());
            }
        }

        std::fs::remove_dir_all(&gist_dir)?;
        println!("Removed {}", gist_dir.display());

        Ok(())
    }
}
