//! Dataset normalization.
//!
//! Runs once over the whole collected dataset:
//! - parses publication dates from the site's mixed textual formats
//! - strips the quotes wrapped around headlines
//! - fills missing aircraft, traveller and route with [`UNKNOWN`]
//! - splits the route into origin, destination, via-stop and stop count
//!
//! An unparseable date fails the whole pass; there is no per-row recovery.

use crate::models::{RawReview, Review, ReviewDataset, UNKNOWN};
use crate::route::split_route;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:st|nd|rd|th)\b").expect("invalid regex: ordinal suffix"));

// chrono only knows three-letter abbreviations.
static SEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsept\b").expect("invalid regex: sept"));

/// Accepted date layouts, tried in order. `%B` also matches three-letter
/// month abbreviations. Slash dates are month-first unless the first number
/// cannot be a month.
const DATE_FORMATS: [&str; 7] = [
    "%d %B %Y",
    "%B %d %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%B-%Y",
];

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("row {row}: unrecognised date {value:?}")]
    Date { row: usize, value: String },
}

/// Normalize every row of `dataset`, keeping row order.
#[instrument(level = "info", skip_all, fields(rows = dataset.len()))]
pub fn normalize(dataset: ReviewDataset) -> Result<Vec<Review>, NormalizeError> {
    let reviews = dataset
        .into_records()
        .into_iter()
        .enumerate()
        .map(|(row, raw)| normalize_review(row, raw))
        .collect::<Result<Vec<_>, _>>()?;

    info!(rows = reviews.len(), "Normalized dataset");
    Ok(reviews)
}

fn normalize_review(row: usize, raw: RawReview) -> Result<Review, NormalizeError> {
    let date = match raw.date {
        Some(text) => Some(
            parse_review_date(&text).ok_or(NormalizeError::Date { row, value: text })?,
        ),
        None => None,
    };

    let route = raw
        .route
        .unwrap_or_else(|| UNKNOWN.to_string())
        .trim()
        .to_string();
    let parts = split_route(&route);
    debug!(row, %route, stops = %parts.stops, "Split route");

    Ok(Review {
        date,
        rating: raw.rating,
        headline: raw.headline.map(|h| strip_quotes(&h).to_string()),
        verified: raw.verified,
        review_body: raw.review_body,
        aircraft: raw.aircraft.unwrap_or_else(|| UNKNOWN.to_string()),
        traveller: raw.traveller.unwrap_or_else(|| UNKNOWN.to_string()),
        seat_type: raw.seat_type,
        route,
        date_flown: raw.date_flown,
        ratings: raw.ratings,
        recommended: raw.recommended,
        from: parts.from,
        to: parts.to,
        via: parts.via,
        stops: parts.stops,
    })
}

/// Parse a publication date such as `"19th March 2024"` or `"2024-03-19"`.
pub fn parse_review_date(text: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL_SUFFIX.replace_all(text, "$1").replace(',', " ");
    let cleaned = SEPT.replace_all(&cleaned, "Sep");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
}

/// Remove every leading and trailing double quote.
pub fn strip_quotes(text: &str) -> &str {
    text.trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RatingCategory, Stops};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_review_date_formats() {
        assert_eq!(parse_review_date("19th March 2024"), Some(ymd(2024, 3, 19)));
        assert_eq!(parse_review_date("1st Feb 2023"), Some(ymd(2023, 2, 1)));
        assert_eq!(parse_review_date("22nd  August 2019"), Some(ymd(2019, 8, 22)));
        assert_eq!(parse_review_date("3rd June 2021"), Some(ymd(2021, 6, 3)));
        assert_eq!(parse_review_date("March 19, 2024"), Some(ymd(2024, 3, 19)));
        assert_eq!(parse_review_date("2024-03-19"), Some(ymd(2024, 3, 19)));
        assert_eq!(parse_review_date("03/19/2024"), Some(ymd(2024, 3, 19)));
        assert_eq!(parse_review_date("19/03/2024"), Some(ymd(2024, 3, 19)));
        assert_eq!(parse_review_date("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_review_date("19th Sept 2024"), Some(ymd(2024, 9, 19)));
        assert_eq!(parse_review_date("7th September 2023"), Some(ymd(2023, 9, 7)));
        assert_eq!(parse_review_date("yesterday"), None);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"Great flight\""), "Great flight");
        assert_eq!(strip_quotes("\"\"double\"\""), "double");
        assert_eq!(strip_quotes("no quotes"), "no quotes");
        assert_eq!(strip_quotes("say \"hi\" inside"), "say \"hi\" inside");
    }

    #[test]
    fn test_normalize_fills_unknown_and_strips_headline() {
        let dataset = ReviewDataset::from(vec![RawReview {
            date: Some("5th January 2024".to_string()),
            rating: Some(2),
            headline: Some("\"Great flight\"".to_string()),
            ..Default::default()
        }]);

        let reviews = normalize(dataset).unwrap();
        let review = &reviews[0];
        assert_eq!(review.date, Some(ymd(2024, 1, 5)));
        assert_eq!(review.headline.as_deref(), Some("Great flight"));
        assert_eq!(review.aircraft, UNKNOWN);
        assert_eq!(review.traveller, UNKNOWN);
        assert_eq!(review.route, UNKNOWN);
        assert_eq!(review.from, UNKNOWN);
        assert_eq!(review.to, None);
        assert_eq!(review.via, None);
        assert_eq!(review.stops, Stops::Direct);
        // Untouched columns pass through.
        assert_eq!(review.seat_type, None);
        assert_eq!(review.recommended, None);
    }

    #[test]
    fn test_normalize_trims_and_splits_route() {
        let mut raw = RawReview {
            route: Some("  London to New York via Boston ".to_string()),
            aircraft: Some("Boeing 787".to_string()),
            ..Default::default()
        };
        raw.ratings.insert(RatingCategory::SeatComfort, "4 stars".to_string());

        let reviews = normalize(ReviewDataset::from(vec![raw])).unwrap();
        let review = &reviews[0];
        assert_eq!(review.date, None);
        assert_eq!(review.route, "London to New York via Boston");
        assert_eq!(review.from, "London");
        assert_eq!(review.to.as_deref(), Some("New York"));
        assert_eq!(review.via.as_deref(), Some("Boston"));
        assert_eq!(review.stops, Stops::OneStop);
        assert_eq!(review.aircraft, "Boeing 787");
        assert_eq!(review.category(RatingCategory::SeatComfort), Some("4 stars"));
    }

    #[test]
    fn test_normalize_fails_on_bad_date() {
        let dataset = ReviewDataset::from(vec![
            RawReview {
                date: Some("2nd May 2022".to_string()),
                ..Default::default()
            },
            RawReview {
                date: Some("sometime last year".to_string()),
                ..Default::default()
            },
        ]);

        let err = normalize(dataset).unwrap_err();
        match err {
            NormalizeError::Date { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "sometime last year");
            }
        }
    }

    #[test]
    fn test_normalize_keeps_row_order() {
        let dataset = ReviewDataset::from(
            (1..=4)
                .map(|i| RawReview {
                    rating: Some(i),
                    ..Default::default()
                })
                .collect::<Vec<_>>(),
        );
        let ratings: Vec<_> = normalize(dataset)
            .unwrap()
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(ratings, vec![Some(1), Some(2), Some(3), Some(4)]);
    }
}
