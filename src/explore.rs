//! Column exploration and dataset diagnostics.
//!
//! Columns are addressed by the names used in the export header (e.g.
//! `"Seat Comfort"`). [`explore`] builds a [`ColumnReport`] for one column;
//! [`print_exploration`] prints it, or reports an unknown column without
//! failing. [`DatasetInfo`] is the whole-dataset overview printed at the end
//! of a run.

use crate::models::{RatingCategory, Review};
use chrono::NaiveDate;
use itertools::Itertools;
use std::fmt::{self, Write};
use std::str::FromStr;
use tracing::{error, info};

/// Number of distinct values shown in a report preview.
const DISTINCT_PREVIEW: usize = 10;

/// Number of rows shown by [`DatasetInfo`].
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExploreError {
    #[error("Column '{0}' not found in the dataset.")]
    UnknownColumn(String),
}

/// A column of the normalized dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Rating,
    Headline,
    Verified,
    Aircraft,
    Traveller,
    SeatType,
    Route,
    DateFlown,
    Category(RatingCategory),
    Recommended,
    Review,
    From,
    To,
    Via,
    Stops,
}

impl Column {
    /// Every column, in export order.
    pub fn all() -> Vec<Column> {
        let mut columns = vec![
            Column::Date,
            Column::Rating,
            Column::Headline,
            Column::Verified,
            Column::Aircraft,
            Column::Traveller,
            Column::SeatType,
            Column::Route,
            Column::DateFlown,
        ];
        columns.extend(RatingCategory::ALL.into_iter().map(Column::Category));
        columns.extend([
            Column::Recommended,
            Column::Review,
            Column::From,
            Column::To,
            Column::Via,
            Column::Stops,
        ]);
        columns
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Rating => "Rating",
            Column::Headline => "Headline",
            Column::Verified => "Verified",
            Column::Aircraft => "Aircraft",
            Column::Traveller => "Traveller",
            Column::SeatType => "Seat Type",
            Column::Route => "Route",
            Column::DateFlown => "Date Flown",
            Column::Category(category) => category.label(),
            Column::Recommended => "Recommended",
            Column::Review => "Review",
            Column::From => "From",
            Column::To => "To",
            Column::Via => "Via",
            Column::Stops => "Stops",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Date => ColumnKind::Date,
            Column::Rating => ColumnKind::Integer,
            Column::Verified => ColumnKind::Boolean,
            _ => ColumnKind::Text,
        }
    }

    /// The value of this column in one review.
    pub fn value(self, review: &Review) -> Cell {
        let text = |s: Option<&str>| s.map_or(Cell::Missing, |s| Cell::Text(s.to_string()));
        match self {
            Column::Date => review.date.map_or(Cell::Missing, Cell::Date),
            Column::Rating => review.rating.map_or(Cell::Missing, Cell::Integer),
            Column::Headline => text(review.headline.as_deref()),
            Column::Verified => Cell::Boolean(review.verified),
            Column::Aircraft => text(Some(review.aircraft.as_str())),
            Column::Traveller => text(Some(review.traveller.as_str())),
            Column::SeatType => text(review.seat_type.as_deref()),
            Column::Route => text(Some(review.route.as_str())),
            Column::DateFlown => text(review.date_flown.as_deref()),
            Column::Category(category) => text(review.category(category)),
            Column::Recommended => text(review.recommended.as_deref()),
            Column::Review => text(review.review_body.as_deref()),
            Column::From => text(Some(review.from.as_str())),
            Column::To => text(review.to.as_deref()),
            Column::Via => text(review.via.as_deref()),
            Column::Stops => text(Some(review.stops.as_str())),
        }
    }
}

impl FromStr for Column {
    type Err = ExploreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Column::all()
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ExploreError::UnknownColumn(name.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Boolean,
    Date,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        })
    }
}

/// One value of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Missing,
    Integer(i32),
    Boolean(bool),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => f.write_str("<missing>"),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Boolean(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Descriptive statistics for a numeric column, over present values only.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Everything [`print_exploration`] shows for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub column: Column,
    pub kind: ColumnKind,
    /// Distinct values including `Missing`, in first-seen order.
    pub distinct: Vec<Cell>,
    /// Present values with their counts, most frequent first.
    pub value_counts: Vec<(Cell, usize)>,
    pub missing: usize,
    pub rows: usize,
    pub summary: Option<NumericSummary>,
}

impl ColumnReport {
    pub fn missing_percentage(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.missing as f64 / self.rows as f64 * 100.0
        }
    }
}

/// Build a report for the column called `name`.
pub fn explore(reviews: &[Review], name: &str) -> Result<ColumnReport, ExploreError> {
    let column: Column = name.parse()?;
    let cells: Vec<Cell> = reviews.iter().map(|r| column.value(r)).collect();

    let distinct: Vec<Cell> = cells.iter().unique().cloned().collect();
    let missing = cells.iter().filter(|c| c.is_missing()).count();

    let counts = cells.iter().filter(|c| !c.is_missing()).counts();
    // Stable sort keeps first-seen order among equal counts.
    let mut value_counts: Vec<(Cell, usize)> = distinct
        .iter()
        .filter_map(|c| counts.get(c).map(|n| (c.clone(), *n)))
        .collect();
    value_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let summary = if column.kind().is_numeric() {
        let values: Vec<f64> = cells
            .iter()
            .filter_map(|c| match c {
                Cell::Integer(n) => Some(f64::from(*n)),
                _ => None,
            })
            .collect();
        NumericSummary::from_values(&values)
    } else {
        None
    };

    Ok(ColumnReport {
        column,
        kind: column.kind(),
        distinct,
        value_counts,
        missing,
        rows: reviews.len(),
        summary,
    })
}

impl fmt::Display for ColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exploring Column: '{}'\n", self.column)?;

        writeln!(f, "1. Data Type:")?;
        writeln!(f, "   {}\n", self.kind)?;

        let preview = self
            .distinct
            .iter()
            .take(DISTINCT_PREVIEW)
            .map(preview_value)
            .join(", ");
        let more = if self.distinct.len() > DISTINCT_PREVIEW { "..." } else { "" };
        writeln!(f, "2. Unique Values:")?;
        writeln!(f, "   Count: {}", self.distinct.len())?;
        writeln!(f, "   Values: [{preview}]{more}\n")?;

        writeln!(f, "3. Value Counts:")?;
        for (cell, count) in &self.value_counts {
            let label = cell.to_string();
            writeln!(f, "   {label:<40} {count}")?;
        }

        writeln!(f, "\n4. Missing Values:")?;
        writeln!(f, "   Count: {}", self.missing)?;
        writeln!(f, "   Percentage: {:.2}%\n", self.missing_percentage())?;

        if let Some(s) = &self.summary {
            writeln!(f, "5. Statistical Summary:")?;
            writeln!(f, "   count {:>12}", s.count)?;
            for (label, value) in [
                ("mean", s.mean),
                ("std", s.std),
                ("min", s.min),
                ("25%", s.q25),
                ("50%", s.median),
                ("75%", s.q75),
                ("max", s.max),
            ] {
                writeln!(f, "   {label:<5} {value:>12.6}")?;
            }
        }
        Ok(())
    }
}

/// Print a report for `name`, or report that the column does not exist.
///
/// Never fails; an unknown column is logged and printed as an error line.
pub fn print_exploration(reviews: &[Review], name: &str) -> Option<ColumnReport> {
    match explore(reviews, name) {
        Ok(report) => {
            info!(column = %report.column, distinct = report.distinct.len(), missing = report.missing, "Explored column");
            println!("{report}");
            Some(report)
        }
        Err(e) => {
            error!(column = name, error = %e, "Column exploration failed");
            println!("Error: {e}");
            None
        }
    }
}

/// Whole-dataset overview: row count, per-column non-null counts and types,
/// and the first few rows.
#[derive(Debug)]
pub struct DatasetInfo<'a> {
    reviews: &'a [Review],
}

impl<'a> DatasetInfo<'a> {
    pub fn new(reviews: &'a [Review]) -> Self {
        Self { reviews }
    }

    /// `(column, non-missing count, kind)` for every column.
    pub fn column_counts(&self) -> Vec<(Column, usize, ColumnKind)> {
        Column::all()
            .into_iter()
            .map(|c| {
                let present = self
                    .reviews
                    .iter()
                    .filter(|r| !c.value(r).is_missing())
                    .count();
                (c, present, c.kind())
            })
            .collect()
    }
}

impl fmt::Display for DatasetInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reviews: {} rows", self.reviews.len())?;
        writeln!(f, " #  {:<24} {:>14}  Type", "Column", "Non-Missing")?;
        for (i, (column, present, kind)) in self.column_counts().into_iter().enumerate() {
            writeln!(f, "{i:>2}  {:<24} {present:>14}  {kind}", column.name())?;
        }

        writeln!(f)?;
        let preview_columns = [
            Column::Date,
            Column::Rating,
            Column::Verified,
            Column::From,
            Column::To,
            Column::Stops,
            Column::Headline,
        ];
        let mut line = String::new();
        for column in preview_columns {
            let _ = write!(line, "{:<16}", column.name());
        }
        writeln!(f, "{}", line.trim_end())?;
        for review in self.reviews.iter().take(PREVIEW_ROWS) {
            line.clear();
            for column in preview_columns {
                let cell = column.value(review).to_string();
                let _ = write!(line, "{:<16}", truncate_chars(&cell, 15));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        if self.reviews.len() > PREVIEW_ROWS {
            writeln!(f, "... {} more rows", self.reviews.len() - PREVIEW_ROWS)?;
        }
        Ok(())
    }
}

fn preview_value(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
