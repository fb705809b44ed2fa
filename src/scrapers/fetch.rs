//! Page fetching.
//!
//! The extraction pipeline only needs "give me the HTML for page N". The
//! [`FetchPage`] trait captures that seam so the page loop can run against
//! the live site ([`HttpFetcher`]) or against canned pages in tests.

use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Errors raised while fetching a listing page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid page url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request for page {page} failed: {source}")]
    Http {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
}

/// Source of raw listing-page HTML.
pub trait FetchPage {
    /// Fetch page `page` (1-based) listing `page_size` reviews.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<String, FetchError>;
}

/// Fetches pages from the live review site over HTTP.
///
/// One request per page, no retries. A non-success status is an error.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Listing URL for a page, newest reviews first.
    pub fn page_url(&self, page: u32, page_size: u32) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/page/{}/?sortby=post_date:Desc&pagesize={}",
            self.base_url.trim_end_matches('/'),
            page,
            page_size
        );
        Url::parse(&raw).map_err(|source| FetchError::Url { url: raw, source })
    }

    async fn get_text(&self, url: Url) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<String, FetchError> {
        let url = self.page_url(page, page_size)?;
        let t0 = Instant::now();

        let result = self.get_text(url.clone()).await;
        let dt = t0.elapsed();

        match result {
            Ok(body) => {
                debug!(%url, bytes = body.len(), elapsed_ms = dt.as_millis() as u128, "Fetched page");
                Ok(body)
            }
            Err(source) => {
                warn!(%url, elapsed_ms = dt.as_millis() as u128, error = %source, "Page fetch failed");
                Err(FetchError::Http { page, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let fetcher = HttpFetcher::new("https://www.airlinequality.com/airline-reviews/british-airways");
        let url = fetcher.page_url(3, 100).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.airlinequality.com/airline-reviews/british-airways/page/3/?sortby=post_date:Desc&pagesize=100"
        );
    }

    #[test]
    fn test_page_url_trailing_slash() {
        let fetcher = HttpFetcher::new("https://example.com/reviews/");
        let url = fetcher.page_url(1, 10).unwrap();
        assert_eq!(url.path(), "/reviews/page/1/");
        assert_eq!(url.query(), Some("sortby=post_date:Desc&pagesize=10"));
    }

    #[test]
    fn test_page_url_rejects_relative_base() {
        let fetcher = HttpFetcher::new("airline-reviews/british-airways");
        let err = fetcher.page_url(1, 10).unwrap_err();
        assert!(matches!(err, FetchError::Url { .. }));
    }
}
