//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable. The
//! defaults scrape ten pages of 100 British Airways reviews and explore the
//! `Seat Comfort` column.

use crate::scrapers::page::ScrapeConfig;
use crate::scrapers::review::{ExtractOptions, FailurePolicy, MissingRating};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.airlinequality.com/airline-reviews/british-airways";

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: 10 pages x 100 reviews, no export
/// airline_reviews
///
/// # Two pages, export to CSV, explore the rating column
/// airline_reviews --pages 2 --export ./out/reviews.csv --explore-column Rating
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Review listing URL for one airline, without the `/page/N/` suffix
    #[arg(short, long, env = "REVIEWS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of listing pages to fetch
    #[arg(short, long, env = "REVIEWS_PAGES", default_value_t = 10)]
    pub pages: u32,

    /// Reviews requested per page
    #[arg(short = 's', long, env = "REVIEWS_PAGE_SIZE", default_value_t = 100)]
    pub page_size: u32,

    /// Write the normalized dataset to this CSV file
    #[arg(short, long, env = "REVIEWS_EXPORT")]
    pub export: Option<PathBuf>,

    /// Column to explore after normalization
    #[arg(long, env = "REVIEWS_EXPLORE_COLUMN", default_value = "Seat Comfort")]
    pub explore_column: String,

    /// Keep reviews without a rating instead of failing the page
    #[arg(long, env = "REVIEWS_ALLOW_MISSING_RATING")]
    pub allow_missing_rating: bool,

    /// Skip reviews that fail to extract instead of failing the page
    #[arg(long, env = "REVIEWS_SKIP_BAD_REVIEWS")]
    pub skip_bad_reviews: bool,
}

impl Cli {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            pages: self.pages,
            page_size: self.page_size,
            extract: ExtractOptions {
                missing_rating: if self.allow_missing_rating {
                    MissingRating::Null
                } else {
                    MissingRating::Reject
                },
                on_failure: if self.skip_bad_reviews {
                    FailurePolicy::Skip
                } else {
                    FailurePolicy::Abort
                },
            },
        }
    }
}
