//! Page aggregation and the page loop.
//!
//! [`extract_page`] turns one listing page into reviews in document order.
//! [`collect_reviews`] drives it over pages `1..=pages`, strictly one page at
//! a time, and accumulates everything into a [`ReviewDataset`].

use crate::models::{RawReview, ReviewDataset};
use crate::scrapers::fetch::{FetchError, FetchPage};
use crate::scrapers::review::{extract_review, ExtractError, ExtractOptions, FailurePolicy};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

static REVIEW_FRAGMENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"article[itemprop="review"]"#).expect("invalid selector: review fragment")
});

/// Errors that abort a scraping run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("page {page}: {source}")]
    Extract {
        page: u32,
        #[source]
        source: ExtractError,
    },
}

/// Page loop settings.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeConfig {
    /// Number of listing pages to fetch, starting at page 1.
    pub pages: u32,
    /// Reviews per page requested from the site.
    pub page_size: u32,
    pub extract: ExtractOptions,
}

/// Reviews extracted from one page.
///
/// `failures` is only ever non-empty under [`FailurePolicy::Skip`].
#[derive(Debug, Default)]
pub struct PageOutcome {
    pub reviews: Vec<RawReview>,
    pub failures: Vec<ExtractError>,
}

/// Extract every review fragment on a page, in document order.
///
/// Under [`FailurePolicy::Abort`] the first failing fragment fails the page.
pub fn extract_page(html: &str, options: &ExtractOptions) -> Result<PageOutcome, ExtractError> {
    let document = Html::parse_document(html);
    let mut outcome = PageOutcome::default();

    for (index, fragment) in document.select(&REVIEW_FRAGMENT).enumerate() {
        match extract_review(fragment, index, options) {
            Ok(review) => outcome.reviews.push(review),
            Err(e) => match options.on_failure {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    debug!(index, error = %e, "Skipping review that failed to extract");
                    outcome.failures.push(e);
                }
            },
        }
    }

    Ok(outcome)
}

/// Summary of a finished run alongside the collected dataset.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub dataset: ReviewDataset,
    /// Fragments dropped under [`FailurePolicy::Skip`], tagged with their page.
    pub skipped: Vec<(u32, ExtractError)>,
}

/// Fetch and extract pages `1..=config.pages` in order.
///
/// Any fetch error, or an extraction error under [`FailurePolicy::Abort`],
/// ends the run with nothing collected.
#[instrument(level = "info", skip_all, fields(pages = config.pages, page_size = config.page_size))]
pub async fn collect_reviews<F: FetchPage>(
    fetcher: &F,
    config: &ScrapeConfig,
) -> Result<ScrapeOutcome, ScrapeError> {
    let mut dataset = ReviewDataset::new();
    let mut skipped = Vec::new();

    for page in 1..=config.pages {
        info!(page, "Fetching page");
        let html = fetcher.fetch_page(page, config.page_size).await?;

        let outcome = extract_page(&html, &config.extract)
            .map_err(|source| ScrapeError::Extract { page, source })?;
        info!(
            page,
            reviews = outcome.reviews.len(),
            failed = outcome.failures.len(),
            "Extracted page"
        );

        dataset.extend(outcome.reviews);
        skipped.extend(outcome.failures.into_iter().map(|e| (page, e)));
    }

    info!(total = dataset.len(), skipped = skipped.len(), "Collected reviews");
    Ok(ScrapeOutcome { dataset, skipped })
}
