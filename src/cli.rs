//! Command-line interface definitions.
//!
//! The API key and listening port can come from flags or from the `API_KEY`
//! and `PORT` environment variables.

use crate::models::Category;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for U-Space News.
///
/// # Examples
///
/// ```sh
/// # Browse interactively, starting on rockets
/// API_KEY=... uspace_news browse --category rockets
///
/// # One-shot fetch printed as JSON
/// uspace_news --api-key ... fetch astronomy
///
/// # Serve the built page on port 3000
/// PORT=3000 uspace_news serve --dist-dir ./dist
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Gemini API key; also injected into the served page
    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse news interactively in the terminal
    Browse {
        /// Category to open with
        #[arg(long, default_value = "all")]
        category: Category,
    },
    /// Fetch one batch and print it as JSON
    Fetch {
        category: Category,

        /// Write to {dir}/{date}/{CATEGORY}.json instead of stdout
        #[arg(short, long)]
        json_output_dir: Option<PathBuf>,
    },
    /// Serve the built single-page app with the API key injected
    Serve {
        #[arg(short, long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Directory holding index.html and built assets
        #[arg(long, default_value = "dist")]
        dist_dir: PathBuf,
    },
}
