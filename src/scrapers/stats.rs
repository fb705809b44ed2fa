//! Breakdown table parsing.
//!
//! Each review carries a two-column table of attributes (`Aircraft`, `Route`,
//! `Seat Comfort`, ...). Values are either plain text cells or star cells,
//! where the score is the number of `span.star` icons marked `fill`.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;
use tracing::trace;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("invalid selector: row"));
static HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.review-rating-header").expect("invalid selector: header"));
static VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.review-value").expect("invalid selector: value"));
static STAR_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.review-rating-stars").expect("invalid selector: star cell"));
static STAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.star").expect("invalid selector: star"));

/// Parse every breakdown row under `fragment` into a label → value map.
///
/// Rows without both a header cell and a value cell are skipped. A later row
/// with the same label replaces the earlier one.
pub fn parse_stats(fragment: ElementRef<'_>) -> BTreeMap<String, String> {
    let mut stats = BTreeMap::new();

    for row in fragment.select(&ROW) {
        let Some(header) = row.select(&HEADER).next() else {
            continue;
        };
        let Some(value) = row
            .select(&VALUE)
            .next()
            .or_else(|| row.select(&STAR_CELL).next())
        else {
            continue;
        };

        let key = element_text(header);
        let parsed = if has_class(value, "stars") {
            format!("{} stars", count_filled_stars(value))
        } else {
            element_text(value)
        };
        trace!(%key, value = %parsed, "Parsed breakdown row");
        stats.insert(key, parsed);
    }

    stats
}

fn count_filled_stars(cell: ElementRef<'_>) -> usize {
    cell.select(&STAR)
        .filter(|star| has_class(*star, "fill"))
        .count()
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Concatenated descendant text, trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn stats_of(table_rows: &str) -> BTreeMap<String, String> {
        let html = format!(
            r#"<article itemprop="review"><table class="review-ratings">{table_rows}</table></article>"#
        );
        let document = Html::parse_document(&html);
        let selector = Selector::parse("article").unwrap();
        let fragment = document.select(&selector).next().unwrap();
        parse_stats(fragment)
    }

    fn star_row(label: &str, filled: usize, total: usize) -> String {
        let stars: String = (0..total)
            .map(|i| {
                if i < filled {
                    r#"<span class="star fill">*</span>"#
                } else {
                    r#"<span class="star">*</span>"#
                }
            })
            .collect();
        format!(
            r#"<tr><td class="review-rating-header {label}">{label}</td><td class="review-rating-stars stars">{stars}</td></tr>"#
        )
    }

    #[test]
    fn test_star_cell_counts_filled() {
        let stats = stats_of(&star_row("Seat Comfort", 3, 5));
        assert_eq!(stats.get("Seat Comfort").map(String::as_str), Some("3 stars"));
    }

    #[test]
    fn test_star_cell_with_no_filled_stars() {
        let stats = stats_of(&star_row("Ground Service", 0, 5));
        assert_eq!(stats.get("Ground Service").map(String::as_str), Some("0 stars"));
    }

    #[test]
    fn test_text_cell_is_trimmed() {
        let stats = stats_of(
            r#"<tr><td class="review-rating-header aircraft">Aircraft</td><td class="review-value">  Boeing 777-300 </td></tr>"#,
        );
        assert_eq!(stats.get("Aircraft").map(String::as_str), Some("Boeing 777-300"));
    }

    #[test]
    fn test_duplicate_header_later_row_wins() {
        let stats = stats_of(concat!(
            r#"<tr><td class="review-rating-header">Seat Type</td><td class="review-value">Economy Class</td></tr>"#,
            r#"<tr><td class="review-rating-header">Seat Type</td><td class="review-value">Business Class</td></tr>"#,
        ));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get("Seat Type").map(String::as_str), Some("Business Class"));
    }

    #[test]
    fn test_rows_missing_a_cell_are_skipped() {
        let stats = stats_of(concat!(
            r#"<tr><td class="review-rating-header">Route</td></tr>"#,
            r#"<tr><td class="review-value">orphan value</td></tr>"#,
            r#"<tr><td class="review-rating-header">Recommended</td><td class="review-value">no</td></tr>"#,
        ));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get("Recommended").map(String::as_str), Some("no"));
    }

    #[test]
    fn test_text_cell_preferred_over_star_cell() {
        let stats = stats_of(
            r#"<tr><td class="review-rating-header">Value For Money</td><td class="review-rating-stars stars"><span class="star fill">*</span></td><td class="review-value">n/a</td></tr>"#,
        );
        assert_eq!(stats.get("Value For Money").map(String::as_str), Some("n/a"));
    }

    #[test]
    fn test_star_cell_without_stars_class_is_text() {
        let stats = stats_of(
            r#"<tr><td class="review-rating-header">Wifi &amp; Connectivity</td><td class="review-rating-stars"> N/A </td></tr>"#,
        );
        assert_eq!(stats.get("Wifi & Connectivity").map(String::as_str), Some("N/A"));
    }
}
