use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::PriceBookError;
use crate::extraction::PageContent;

/// Known plant names a price list can be attributed to. A document that
/// matches none of these cannot be safely assigned to a partition.
pub const PLANT_VOCABULARY: [&str; 8] = [
    "STATESVILLE",
    "HUDSON'S",
    "LAKELAND",
    "GAINESVILLE",
    "SHELBYVILLE",
    "ST. JOSEPH",
    "OKEECHOBEE",
    "MARION",
];

// Effective-date patterns, in priority order. Dates are US-style
// month/day/year with "/" or "-" separators and 2- or 4-digit years.
static LABEL_THEN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)effective\s+date\s*:?\s*(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})").unwrap()
});
static DATE_THEN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\s+effective").unwrap()
});
static BARE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})").unwrap());

/// One matcher strategy: a pure function from text to an optional date.
type DateMatcher = fn(&str) -> Option<NaiveDate>;

const DATE_MATCHERS: [DateMatcher; 3] = [
    match_label_then_date,
    match_date_then_label,
    match_bare_date,
];

/// Locate the effective date in the document text.
///
/// Matchers are tried in priority order; the first one that yields a
/// calendar-valid date anywhere in the text wins.
pub fn scan_effective_date(pages: &[PageContent]) -> Result<NaiveDate, PriceBookError> {
    let text = page_text(pages);

    for matcher in DATE_MATCHERS {
        if let Some(date) = matcher(&text) {
            tracing::debug!(%date, "resolved effective date");
            return Ok(date);
        }
    }

    Err(PriceBookError::DateNotFound)
}

/// Locate the plant name in the document text by vocabulary lookup.
///
/// When the text mentions more than one known plant, the earliest mention
/// wins: the issuing plant heads the document, competitors' names show up
/// later in prose if at all.
pub fn scan_plant_location(pages: &[PageContent]) -> Result<String, PriceBookError> {
    let upper = page_text(pages).to_uppercase();

    PLANT_VOCABULARY
        .iter()
        .filter_map(|plant| upper.find(plant).map(|pos| (pos, *plant)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, plant)| plant.to_string())
        .ok_or(PriceBookError::LocationNotFound)
}

fn page_text(pages: &[PageContent]) -> String {
    let mut text = String::new();
    for page in pages {
        for line in &page.lines {
            text.push_str(line);
            text.push('\n');
        }
    }
    text
}

fn match_label_then_date(text: &str) -> Option<NaiveDate> {
    first_valid_date(&LABEL_THEN_DATE, text)
}

fn match_date_then_label(text: &str) -> Option<NaiveDate> {
    first_valid_date(&DATE_THEN_LABEL, text)
}

fn match_bare_date(text: &str) -> Option<NaiveDate> {
    first_valid_date(&BARE_DATE, text)
}

/// First capture of `re` in `text` that builds a valid calendar date.
/// Impossible dates (13/45/99) are skipped, not errors.
fn first_valid_date(re: &Regex, text: &str) -> Option<NaiveDate> {
    re.captures_iter(text).find_map(|caps| {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let year = if year < 100 { 2000 + year } else { year };
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(lines: &[&str]) -> Vec<PageContent> {
        vec![PageContent {
            page_number: 1,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }]
    }

    #[test]
    fn test_label_then_date() {
        let pages = page(&["Price List", "Effective Date 01/06/25"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_label_with_colon_and_four_digit_year() {
        let pages = page(&["Effective Date: 10/07/2024"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 10, 7).unwrap());
    }

    #[test]
    fn test_date_then_label() {
        let pages = page(&["01/06/25 Effective", "Statesville NC"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_dash_separators() {
        let pages = page(&["Effective Date 1-6-25"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_labeled_date_beats_earlier_bare_date() {
        // A stray date earlier in the text must not win over the labeled one.
        let pages = page(&["Printed 12/31/24", "Effective Date 01/06/25"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_bare_date_fallback() {
        let pages = page(&["Statesville 01/06/25"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        let pages = page(&["Doc 13/45/99", "Effective Date 01/06/25"]);
        let date = scan_effective_date(&pages).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_no_date_is_fatal() {
        let pages = page(&["No dates here"]);
        assert!(matches!(
            scan_effective_date(&pages),
            Err(PriceBookError::DateNotFound)
        ));
    }

    #[test]
    fn test_plant_location_found() {
        let pages = page(&["Purina Animal Nutrition", "STATESVILLE NC"]);
        assert_eq!(scan_plant_location(&pages).unwrap(), "STATESVILLE");
    }

    #[test]
    fn test_plant_location_case_insensitive() {
        let pages = page(&["Hudson's Feed Mill"]);
        assert_eq!(scan_plant_location(&pages).unwrap(), "HUDSON'S");
    }

    #[test]
    fn test_earliest_mentioned_plant_wins() {
        // MARION sits last in the vocabulary but first in the text.
        let pages = page(&["MARION VA Price List", "versus STATESVILLE pricing"]);
        assert_eq!(scan_plant_location(&pages).unwrap(), "MARION");
    }

    #[test]
    fn test_unknown_plant_is_fatal() {
        let pages = page(&["Some Unknown Mill"]);
        assert!(matches!(
            scan_plant_location(&pages),
            Err(PriceBookError::LocationNotFound)
        ));
    }
}
