//! Review fragment extraction.
//!
//! Turns one `article[itemprop="review"]` subtree into a [`RawReview`].
//! Sub-elements that are missing produce `None` fields; only the overall
//! rating can fail extraction (see [`MissingRating`]).

use crate::models::{RatingCategory, RatingsBreakdown, RawReview, VERIFIED_SENTINEL};
use crate::scrapers::stats::{element_text, parse_stats};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use std::num::ParseIntError;
use tracing::{debug, instrument};

static RATING: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"span[itemprop="ratingValue"]"#).expect("invalid selector: rating")
});
static DATE_PUBLISHED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"time[itemprop="datePublished"]"#).expect("invalid selector: date")
});
static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.text_header").expect("invalid selector: headline"));
static BODY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[itemprop="reviewBody"]"#).expect("invalid selector: body")
});

const AIRCRAFT: &str = "Aircraft";
const TRAVELLER: &str = "Type Of Traveller";
const SEAT_TYPE: &str = "Seat Type";
const ROUTE: &str = "Route";
const DATE_FLOWN: &str = "Date Flown";
const RECOMMENDED: &str = "Recommended";

/// Errors raised while extracting a single review.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("review {index}: rating element is missing")]
    MissingRating { index: usize },
    #[error("review {index}: rating {value:?} is not an integer: {source}")]
    InvalidRating {
        index: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ExtractError {
    /// Position of the failing fragment within its page.
    pub fn index(&self) -> usize {
        match self {
            ExtractError::MissingRating { index } | ExtractError::InvalidRating { index, .. } => {
                *index
            }
        }
    }
}

/// What to do with a fragment that has no rating element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRating {
    /// Fail extraction. Reviews without a rating are rejected.
    #[default]
    Reject,
    /// Keep the review with `rating: None`.
    Null,
}

/// What to do when one fragment on a page fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The whole page fails.
    #[default]
    Abort,
    /// The failure is recorded and the remaining fragments are kept.
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub missing_rating: MissingRating,
    pub on_failure: FailurePolicy,
}

/// Extract one review from its fragment.
///
/// `index` is the fragment's position on the page and is only used for
/// error reporting.
#[instrument(level = "debug", skip_all, fields(index = index))]
pub fn extract_review(
    fragment: ElementRef<'_>,
    index: usize,
    options: &ExtractOptions,
) -> Result<RawReview, ExtractError> {
    let rating = match first_text(fragment, &RATING) {
        Some(text) => Some(text.parse::<i32>().map_err(|source| ExtractError::InvalidRating {
            index,
            value: text.clone(),
            source,
        })?),
        None => match options.missing_rating {
            MissingRating::Reject => return Err(ExtractError::MissingRating { index }),
            MissingRating::Null => None,
        },
    };

    let date = first_text(fragment, &DATE_PUBLISHED);
    let headline = first_text(fragment, &HEADLINE);
    let (marker, review_body) = match first_text(fragment, &BODY) {
        Some(text) => split_body(&text),
        None => (None, None),
    };
    let verified = marker.as_deref() == Some(VERIFIED_SENTINEL);

    let mut stats = parse_stats(fragment);
    let ratings: RatingsBreakdown = RatingCategory::ALL
        .into_iter()
        .filter_map(|category| stats.remove(category.label()).map(|v| (category, v)))
        .collect();

    let review = RawReview {
        date,
        rating,
        headline,
        verified,
        review_body,
        aircraft: stats.remove(AIRCRAFT),
        traveller: stats.remove(TRAVELLER),
        seat_type: stats.remove(SEAT_TYPE),
        route: stats.remove(ROUTE),
        date_flown: stats.remove(DATE_FLOWN),
        ratings,
        recommended: stats.remove(RECOMMENDED),
    };
    debug!(
        ?review.rating,
        verified,
        categories = review.ratings.len(),
        headline = %truncate_for_log(review.headline.as_deref().unwrap_or_default(), 60),
        "Extracted review"
    );
    Ok(review)
}

/// Split body text on the first `|` into `(marker, body)`.
///
/// Text without a separator yields `(None, None)`.
pub fn split_body(text: &str) -> (Option<String>, Option<String>) {
    match text.split_once('|') {
        Some((marker, body)) => (
            Some(marker.trim().to_string()),
            Some(body.trim().to_string()),
        ),
        None => (None, None),
    }
}

fn first_text(fragment: ElementRef<'_>, selector: &Selector) -> Option<String> {
    fragment.select(selector).next().map(element_text)
}
