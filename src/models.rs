//! Data models for scraped reviews and their normalized representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawReview`]: One review as extracted from a page, before normalization
//! - [`ReviewDataset`]: Ordered accumulator of raw reviews built up page by page
//! - [`Review`]: A normalized review with parsed date and split route
//! - [`RatingCategory`]: The fixed set of per-category ratings in the breakdown table
//!
//! Rows have no primary key. Order is page order, then fragment order within
//! the page, and is never changed after insertion.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Marker text that opens the body of a verified review.
pub const VERIFIED_SENTINEL: &str = "✅ Trip Verified";

/// Value substituted for a missing aircraft, traveller type or route.
pub const UNKNOWN: &str = "Unknown";

/// A per-category rating row in the breakdown table.
///
/// The site renders these either as star icons or as free text, so the value
/// stored alongside a category is always textual (e.g. `"4 stars"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatingCategory {
    SeatComfort,
    CabinStaffService,
    FoodAndBeverages,
    InflightEntertainment,
    GroundService,
    WifiAndConnectivity,
    ValueForMoney,
}

impl RatingCategory {
    /// Every category, in the column order used for display and export.
    pub const ALL: [RatingCategory; 7] = [
        RatingCategory::SeatComfort,
        RatingCategory::CabinStaffService,
        RatingCategory::FoodAndBeverages,
        RatingCategory::InflightEntertainment,
        RatingCategory::GroundService,
        RatingCategory::WifiAndConnectivity,
        RatingCategory::ValueForMoney,
    ];

    /// The header text the site uses for this category.
    pub fn label(self) -> &'static str {
        match self {
            RatingCategory::SeatComfort => "Seat Comfort",
            RatingCategory::CabinStaffService => "Cabin Staff Service",
            RatingCategory::FoodAndBeverages => "Food & Beverages",
            RatingCategory::InflightEntertainment => "Inflight Entertainment",
            RatingCategory::GroundService => "Ground Service",
            RatingCategory::WifiAndConnectivity => "Wifi & Connectivity",
            RatingCategory::ValueForMoney => "Value For Money",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category ratings present on a review. Absent categories have no entry.
pub type RatingsBreakdown = BTreeMap<RatingCategory, String>;

/// A single review as extracted from one fragment, before normalization.
///
/// Every optional field is `None` when its sub-element was absent from the
/// fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReview {
    /// Publication date text, e.g. `"19th March 2024"`.
    pub date: Option<String>,
    /// Overall score, nominally 1–10.
    pub rating: Option<i32>,
    /// Headline text, still wrapped in quotes as the site renders it.
    pub headline: Option<String>,
    /// True iff the body opened with [`VERIFIED_SENTINEL`].
    pub verified: bool,
    /// Body text after the verification marker.
    pub review_body: Option<String>,
    pub aircraft: Option<String>,
    pub traveller: Option<String>,
    pub seat_type: Option<String>,
    pub route: Option<String>,
    pub date_flown: Option<String>,
    pub ratings: RatingsBreakdown,
    /// Free text from the breakdown table, usually `"yes"` or `"no"`.
    pub recommended: Option<String>,
}

/// Ordered accumulator of raw reviews.
///
/// The page loop owns it while scraping and hands it by value to the
/// normalizer once every page has been processed.
#[derive(Debug, Default)]
pub struct ReviewDataset {
    records: Vec<RawReview>,
}

impl ReviewDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page's worth of reviews, preserving their order.
    pub fn extend<I: IntoIterator<Item = RawReview>>(&mut self, reviews: I) {
        self.records.extend(reviews);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<RawReview> {
        self.records
    }
}

impl From<Vec<RawReview>> for ReviewDataset {
    fn from(records: Vec<RawReview>) -> Self {
        Self { records }
    }
}

/// Stop-count category derived from the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stops {
    Direct,
    OneStop,
}

impl Stops {
    pub fn as_str(self) -> &'static str {
        match self {
            Stops::Direct => "Direct",
            Stops::OneStop => "1 stop",
        }
    }
}

impl fmt::Display for Stops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized review.
///
/// `aircraft`, `traveller` and `route` are never missing here: absent values
/// were replaced with [`UNKNOWN`]. `from`, `to`, `via` and `stops` are
/// derived from `route`.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub date: Option<NaiveDate>,
    pub rating: Option<i32>,
    pub headline: Option<String>,
    pub verified: bool,
    pub review_body: Option<String>,
    pub aircraft: String,
    pub traveller: String,
    pub seat_type: Option<String>,
    pub route: String,
    pub date_flown: Option<String>,
    pub ratings: RatingsBreakdown,
    pub recommended: Option<String>,
    pub from: String,
    pub to: Option<String>,
    pub via: Option<String>,
    pub stops: Stops,
}

impl Review {
    /// Rating text for a breakdown category, if the review had one.
    pub fn category(&self, category: RatingCategory) -> Option<&str> {
        self.ratings.get(&category).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_category_labels_are_distinct() {
        let labels: std::collections::BTreeSet<_> =
            RatingCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), RatingCategory::ALL.len());
        assert_eq!(RatingCategory::FoodAndBeverages.to_string(), "Food & Beverages");
    }

    #[test]
    fn test_stops_display() {
        assert_eq!(Stops::Direct.to_string(), "Direct");
        assert_eq!(Stops::OneStop.to_string(), "1 stop");
    }

    #[test]
    fn test_dataset_preserves_insertion_order() {
        let mut dataset = ReviewDataset::new();
        assert!(dataset.is_empty());

        dataset.extend(vec![RawReview {
            headline: Some("first".to_string()),
            ..Default::default()
        }]);
        dataset.extend(vec![
            RawReview {
                headline: Some("second".to_string()),
                ..Default::default()
            },
            RawReview {
                headline: Some("third".to_string()),
                ..Default::default()
            },
        ]);

        assert_eq!(dataset.len(), 3);
        let headlines: Vec<_> = dataset
            .into_records()
            .into_iter()
            .map(|r| r.headline.unwrap())
            .collect();
        assert_eq!(headlines, vec!["first", "second", "third"]);
    }
}
