use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamvariant")]
#[command(about = "Check and resolve stream output variant configs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode variant definitions and report any errors
    Check {
        /// Path to a JSON or TOML variant file
        file: PathBuf,
    },

    /// Print fully-resolved variants as JSON
    Resolve {
        /// Path to a JSON or TOML variant file
        file: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
