//! Review scraping for airlinequality.com listing pages.
//!
//! Scraping runs in two layers:
//!
//! 1. **Fetching**: [`fetch`] retrieves raw HTML for one listing page
//! 2. **Extraction**: [`page`] finds every `article[itemprop="review"]`
//!    fragment and hands it to [`review`], which reads the fixed fields and
//!    delegates the breakdown table to [`stats`]
//!
//! # Page Markup
//!
//! | Field | Element |
//! |-------|---------|
//! | Rating | `span[itemprop="ratingValue"]` |
//! | Date | `time[itemprop="datePublished"]` |
//! | Headline | `h2.text_header` |
//! | Body | `div[itemprop="reviewBody"]`, `"<marker> \| <text>"` |
//! | Breakdown | `tr` rows of `td.review-rating-header` + `td.review-value` or `td.review-rating-stars` |
//!
//! Pages are processed one at a time with no retries; the first fatal error
//! ends the run.

pub mod fetch;
pub mod page;
pub mod review;
pub mod stats;
