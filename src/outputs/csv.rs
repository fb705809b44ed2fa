//! CSV export of the normalized dataset.
//!
//! One header row using the dataset's column names, then one row per review
//! in dataset order. Missing values are written as empty fields and dates as
//! `YYYY-MM-DD`.

use crate::models::{RatingCategory, Review};
use crate::utils::ensure_writable_dir;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Flush(#[source] std::io::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Rating")]
    rating: Option<i32>,
    #[serde(rename = "Headline")]
    headline: Option<&'a str>,
    #[serde(rename = "Verified")]
    verified: bool,
    #[serde(rename = "Aircraft")]
    aircraft: &'a str,
    #[serde(rename = "Traveller")]
    traveller: &'a str,
    #[serde(rename = "Seat Type")]
    seat_type: Option<&'a str>,
    #[serde(rename = "Route")]
    route: &'a str,
    #[serde(rename = "Date Flown")]
    date_flown: Option<&'a str>,
    #[serde(rename = "Seat Comfort")]
    seat_comfort: Option<&'a str>,
    #[serde(rename = "Cabin Staff Service")]
    cabin_staff_service: Option<&'a str>,
    #[serde(rename = "Food & Beverages")]
    food_and_beverages: Option<&'a str>,
    #[serde(rename = "Inflight Entertainment")]
    inflight_entertainment: Option<&'a str>,
    #[serde(rename = "Ground Service")]
    ground_service: Option<&'a str>,
    #[serde(rename = "Wifi & Connectivity")]
    wifi_and_connectivity: Option<&'a str>,
    #[serde(rename = "Value For Money")]
    value_for_money: Option<&'a str>,
    #[serde(rename = "Recommended")]
    recommended: Option<&'a str>,
    #[serde(rename = "Review")]
    review: Option<&'a str>,
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "To")]
    to: Option<&'a str>,
    #[serde(rename = "Via")]
    via: Option<&'a str>,
    #[serde(rename = "Stops")]
    stops: &'static str,
}

impl<'a> From<&'a Review> for CsvRow<'a> {
    fn from(r: &'a Review) -> Self {
        Self {
            date: r.date.map(|d| d.format("%Y-%m-%d").to_string()),
            rating: r.rating,
            headline: r.headline.as_deref(),
            verified: r.verified,
            aircraft: &r.aircraft,
            traveller: &r.traveller,
            seat_type: r.seat_type.as_deref(),
            route: &r.route,
            date_flown: r.date_flown.as_deref(),
            seat_comfort: r.category(RatingCategory::SeatComfort),
            cabin_staff_service: r.category(RatingCategory::CabinStaffService),
            food_and_beverages: r.category(RatingCategory::FoodAndBeverages),
            inflight_entertainment: r.category(RatingCategory::InflightEntertainment),
            ground_service: r.category(RatingCategory::GroundService),
            wifi_and_connectivity: r.category(RatingCategory::WifiAndConnectivity),
            value_for_money: r.category(RatingCategory::ValueForMoney),
            recommended: r.recommended.as_deref(),
            review: r.review_body.as_deref(),
            from: &r.from,
            to: r.to.as_deref(),
            via: r.via.as_deref(),
            stops: r.stops.as_str(),
        }
    }
}

/// Encode reviews as CSV text, header row first.
pub fn to_csv_string(reviews: &[Review]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for review in reviews {
        writer.serialize(CsvRow::from(review))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write reviews to `path` as CSV, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_reviews(reviews: &[Review], path: &Path) -> Result<(), ExportError> {
    let csv = to_csv_string(reviews)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_writable_dir(parent).await?;
    }

    if let Err(e) = fs::write(path, csv).await {
        error!(error = %e, "Failed writing CSV export");
        return Err(e.into());
    }
    info!(rows = reviews.len(), "Wrote CSV export");
    Ok(())
}
