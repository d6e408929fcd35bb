//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Media Ingest - move downloaded media into the library
#[derive(Parser, Debug)]
#[command(name = "media-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the sorted torrent source folders
    #[arg(
        short,
        long,
        global = true,
        env = "INGEST_SRC_PATH",
        default_value = "/mnt/ztmp/torrents/sorted"
    )]
    pub src: PathBuf,

    /// Root of the destination library tree
    #[arg(
        short,
        long,
        global = true,
        env = "INGEST_DST_PATH",
        default_value = "/mnt/video"
    )]
    pub dst: PathBuf,

    /// Ask before running each mv/rm command
    #[arg(short, long, global = true, env = "INGEST_CONFIRM")]
    pub confirm: bool,

    /// Skip items that already exist at the destination
    #[arg(short, long, global = true, env = "INGEST_IGNORE_EXISTING")]
    pub ignore_existing: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import downloaded content into the library (default)
    Import,

    /// Find duplicates between documentary and movie/TV libraries
    Docudups {
        #[command(subcommand)]
        target: DocudupsTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocudupsTarget {
    /// Compare the documentary library against the movie library
    Movies,

    /// Compare the docuseries library against the TV library
    Series,
}
