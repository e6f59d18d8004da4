//! # U-Space News
//!
//! A space-news reader that asks a search-grounded Gemini model for the
//! latest stories, summarized in Japanese, and shows them as a card grid with
//! a category filter and a detail overlay.
//!
//! ## Usage
//!
//! ```sh
//! API_KEY=... uspace_news browse
//! API_KEY=... uspace_news fetch rockets -j ./json
//! API_KEY=... PORT=8080 uspace_news serve --dist-dir ./dist
//! ```
//!
//! ## Architecture
//!
//! 1. **Adapter** ([`news`]): prompt → model → fence stripping → JSON parse,
//!    with a single offline article on any failure
//! 2. **View** ([`view`]): `Loading`/`Ready` state machine with a detail
//!    overlay; only the newest fetch may commit
//! 3. **Shim** ([`server`]): serves the built page with the API key injected

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod news;
mod outputs;
mod server;
mod utils;
mod view;

use api::GeminiClient;
use cli::{Cli, Command};
use config::AppConfig;
use outputs::json;
use server::ShimState;
use view::feed::Feed;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so the browse screen owns stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, "Parsed CLI arguments");

    let config = AppConfig::load(args.config.as_deref()).await?;

    match args.command {
        Command::Browse { category } => {
            let client = GeminiClient::new(args.api_key, &config)?;
            info!(endpoint = %client.endpoint(), %category, "Starting browse session");
            let feed = Feed::mount(Arc::new(client), config.min_loading(), category);
            view::session::browse(feed).await?;
        }
        Command::Fetch {
            category,
            json_output_dir,
        } => {
            let client = GeminiClient::new(args.api_key, &config)?;
            let result = news::fetch_news(&client, category).await;
            match json_output_dir {
                Some(dir) => {
                    json::write_fetch_result(&result, &dir, category).await?;
                }
                None => println!("{}", json::to_pretty_json(&result)?),
            }
        }
        Command::Serve { port, dist_dir } => {
            let state = ShimState {
                dist_dir,
                api_key: args.api_key.unwrap_or_default(),
            };
            server::serve(state, port).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
