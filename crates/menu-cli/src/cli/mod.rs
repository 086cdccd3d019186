//! CLI for the menu viewer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use menu_core::config;
use std::path::PathBuf;

use commands::{run_known, run_resolve, run_show, run_stamp};

/// Top-level CLI for the menu viewer.
#[derive(Debug, Parser)]
#[command(name = "menu")]
#[command(about = "Menu viewer: resolve menu links and display restaurant menus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show which menu a page URL resolves to (and how the URL gets normalized).
    Resolve {
        /// Page URL, e.g. "https://example.com/lightweight-menu/?menu=G%20Lounge".
        url: String,
    },

    /// Resolve a page URL (or a bare menu name) and print the menu.
    Show {
        /// Page URL or menu name.
        target: String,

        /// Push a history entry instead of replacing it when a bare name is given.
        #[arg(long)]
        push: bool,
    },

    /// Set restaurant.updatedAt to the current time in menu JSON files.
    Stamp {
        /// Menu JSON files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List the known menus with their page links.
    Known,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { url } => run_resolve(&cfg, &url)?,
            CliCommand::Show { target, push } => run_show(&cfg, &target, push).await?,
            CliCommand::Stamp { paths } => run_stamp(&paths)?,
            CliCommand::Known => run_known(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
