//! The import command: run every library mapping in turn.

use crate::cli::commands::{movies, series};
use crate::models::library::{library_mappings, IngestConfig, LibraryKind};
use crate::services::prompt::Prompter;
use crate::{Error, Result};
use colored::Colorize;

/// Import downloaded content across all library mappings.
pub async fn import(config: &IngestConfig, prompter: &dyn Prompter) -> Result<()> {
    if !config.src_root.is_dir() {
        return Err(Error::PathNotFound(config.src_root.display().to_string()));
    }
    if !config.dst_root.is_dir() {
        return Err(Error::PathNotFound(config.dst_root.display().to_string()));
    }

    for mapping in library_mappings(config) {
        let src_folder = mapping
            .source
            .root
            .strip_prefix(&config.src_root)
            .unwrap_or(&mapping.source.root);
        let dst_folder = mapping
            .dest
            .root
            .strip_prefix(&config.dst_root)
            .unwrap_or(&mapping.dest.root);

        print!(
            "{}/{} --> {}/{} ",
            config.src_root.display(),
            src_folder.display().to_string().white(),
            config.dst_root.display(),
            dst_folder.display().to_string().bright_blue()
        );
        match mapping.source.kind {
            LibraryKind::Movies => print!("{} ", "(movies)".cyan()),
            LibraryKind::Standup => print!("{} ", "(standup)".cyan()),
            LibraryKind::Series => print!("{} ", "(series)".magenta()),
        }
        if mapping.dest.letter_folders {
            print!("{} ", "(letter)".bright_green());
        }
        println!();

        if !mapping.source.root.is_dir() {
            tracing::debug!(
                "source folder missing, skipping mapping {}: {}",
                mapping.id,
                mapping.source.root.display()
            );
            continue;
        }

        match mapping.source.kind {
            LibraryKind::Movies | LibraryKind::Standup => {
                movies::process_movies(&mapping, config, prompter)?;
            }
            LibraryKind::Series => {
                series::process_series(&mapping, config, prompter).await?;
            }
        }
    }

    Ok(())
}
