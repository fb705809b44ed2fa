//! Scrape → normalize, as one fallible step.

use crate::models::Review;
use crate::normalize::{normalize, NormalizeError};
use crate::scrapers::fetch::FetchPage;
use crate::scrapers::page::{collect_reviews, ScrapeConfig, ScrapeError};
use tracing::{instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Collect every configured page and normalize the result.
#[instrument(level = "info", skip_all)]
pub async fn build_dataset<F: FetchPage>(
    fetcher: &F,
    config: &ScrapeConfig,
) -> Result<Vec<Review>, PipelineError> {
    let outcome = collect_reviews(fetcher, config).await?;
    for (page, e) in &outcome.skipped {
        warn!(page, index = e.index(), error = %e, "Review skipped during extraction");
    }
    if outcome.dataset.is_empty() {
        warn!("No reviews found on any page");
    }
    Ok(normalize(outcome.dataset)?)
}
