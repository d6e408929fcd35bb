//! Media Ingest CLI
//!
//! Moves downloaded movies and series from sorted torrent folders into a
//! curated library tree, comparing video quality against existing copies.

use clap::Parser;
use colored::Colorize;
use media_ingest::cli::args::{Cli, Commands, DocudupsTarget};
use media_ingest::cli::commands::{docudups, import};
use media_ingest::models::library::IngestConfig;
use media_ingest::services::ffprobe;
use media_ingest::services::prompt::TerminalPrompter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = IngestConfig {
        src_root: cli.src,
        dst_root: cli.dst,
        confirm: cli.confirm,
        ignore_existing: cli.ignore_existing,
    };
    let prompter = TerminalPrompter::new();

    if !ffprobe::is_installed() {
        println!(
            "{}",
            "WARNING: ffprobe not found; video details will be unavailable".yellow()
        );
    }

    // Run the appropriate command
    let result = match cli.command.unwrap_or(Commands::Import) {
        Commands::Import => import::import(&config, &prompter).await,
        Commands::Docudups { target } => match target {
            DocudupsTarget::Movies => docudups::docudups_movies(&config, &prompter).await,
            DocudupsTarget::Series => docudups::docudups_series(&config, &prompter).await,
        },
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancelled() => {
            println!("{}", "quitting".bright_black());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_ingest=debug")
    } else {
        EnvFilter::new("media_ingest=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
