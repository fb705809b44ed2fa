//! # Airline Reviews
//!
//! Scrapes paginated customer reviews from airlinequality.com, extracts one
//! structured record per review, and normalizes them into a tabular dataset
//! for exploratory analysis.
//!
//! ## Usage
//!
//! ```sh
//! airline_reviews --pages 10 --page-size 100 --export ./reviews.csv
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Fetching**: Download listing pages `1..=N`, one at a time
//! 2. **Extraction**: Turn every review fragment into a raw record
//! 3. **Normalization**: Parse dates, fill unknowns, split routes
//! 4. **Output**: Explore one column, print dataset info, optionally export CSV

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod explore;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod route;
mod scrapers;
mod utils;

use cli::Cli;
use explore::{print_exploration, DatasetInfo};
use pipeline::build_dataset;
use scrapers::fetch::HttpFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("airline_reviews starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.scrape_config();
    let fetcher = HttpFetcher::new(&args.base_url);
    info!(base_url = %args.base_url, pages = config.pages, page_size = config.page_size, "Scraping reviews");

    let reviews = match build_dataset(&fetcher, &config).await {
        Ok(reviews) => reviews,
        Err(e) => {
            error!(error = %e, "Scrape failed; nothing was written");
            return Err(e.into());
        }
    };

    // ---- Diagnostics ----
    print_exploration(&reviews, &args.explore_column);
    println!("{}", DatasetInfo::new(&reviews));

    // ---- Export ----
    if let Some(path) = &args.export {
        outputs::csv::write_reviews(&reviews, path).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        rows = reviews.len(),
        "Execution complete"
    );

    Ok(())
}
