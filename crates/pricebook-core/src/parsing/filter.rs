use crate::extraction::fragments::{Cell, Fragment, RawRow};

/// A fragment after header/noise filtering. If the fragment contained a
/// repeated header row, the first such row is kept aside so the standardizer
/// can derive column alignment from it.
#[derive(Debug, Clone)]
pub struct FilteredFragment {
    pub page_number: usize,
    pub header: Option<RawRow>,
    pub rows: Vec<RawRow>,
}

/// Rows with fewer non-empty cells are dropped as noise (placeholder lines
/// like "PRICE IN US DOLLAR", stray page furniture).
pub const MIN_SIGNIFICANT_CELLS: usize = 3;

/// A header row must match on at least this many cells; a data row that
/// happens to share a single cell value with a header label is retained.
const MIN_HEADER_CELLS: usize = 3;

/// Words that appear in the canonical column labels. A cell matches the
/// header vocabulary only if every word in it is one of these.
const HEADER_WORDS: [&str; 30] = [
    "PRODUCT",
    "NUMBER",
    "FORMULA",
    "CODE",
    "DESC",
    "DESCRIPTION",
    "NAME",
    "FORM",
    "UNIT",
    "WEIGHT",
    "PALLET",
    "QUANTITY",
    "STOCKING",
    "STATUS",
    "MIN",
    "ORDER",
    "DAYS",
    "LEAD",
    "TIME",
    "FOB",
    "OR",
    "DLV",
    "CHANGE",
    "IN",
    "PRICE",
    "LIST",
    "FULL",
    "HALF",
    "LOAD",
    "BEST",
];

/// Remove repeated header rows and blank/sparse noise rows from a fragment.
pub fn filter_fragment(fragment: Fragment) -> FilteredFragment {
    let mut header = None;
    let mut rows = Vec::new();

    for row in fragment.rows {
        if is_header_row(&row) {
            // Only the first header is useful; repeats on later pages are
            // the same labels again.
            if header.is_none() {
                header = Some(row);
            }
            continue;
        }

        if significant_cells(&row) < MIN_SIGNIFICANT_CELLS && !is_continuation_candidate(&row) {
            continue;
        }

        rows.push(row);
    }

    FilteredFragment {
        page_number: fragment.page_number,
        header,
        rows,
    }
}

/// Whole-row-signature header detection.
///
/// Every non-empty cell must consist solely of header vocabulary words
/// (tolerating case and whitespace variation from the extractor), and at
/// least MIN_HEADER_CELLS cells must be present. Keying on the entire row
/// signature avoids discarding data rows that share one cell with a label.
pub fn is_header_row(row: &[Cell]) -> bool {
    let mut matched = 0;

    for cell in row {
        let sig = normalize_signature(&cell.text);
        if sig.is_empty() {
            continue;
        }
        if !sig.split(' ').all(|word| HEADER_WORDS.contains(&word)) {
            return false;
        }
        matched += 1;
    }

    matched >= MIN_HEADER_CELLS
}

/// Uppercase, strip punctuation, collapse whitespace runs to single spaces.
pub fn normalize_signature(text: &str) -> String {
    let upper = text.to_uppercase();
    let cleaned: String = upper
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A sparse row whose first cell sits off column zero has no product-number
/// cell; it may be the tail of a row split across a page break, however few
/// cells it carries. Such rows pass through to the standardizer, which
/// merges them into their predecessor or drops them as orphans.
pub fn is_continuation_candidate(row: &[Cell]) -> bool {
    row.first().map(|c| c.start > 0).unwrap_or(false)
}

fn significant_cells(row: &[Cell]) -> usize {
    row.iter().filter(|c| !c.text.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fragments::split_cells;

    #[test]
    fn test_exact_header_row_detected() {
        let row = split_cells(
            "PRODUCT NUMBER   FORMULA CODE   PRODUCT DESC.   UNIT WEIGHT   LIST PRICE",
        );
        assert!(is_header_row(&row));
    }

    #[test]
    fn test_header_detection_tolerates_case_and_whitespace() {
        let row = split_cells("product  number    Formula Code    List  Price");
        assert!(is_header_row(&row));
    }

    #[test]
    fn test_data_row_sharing_one_header_cell_retained() {
        // "FULL" alone matches the vocabulary but the product number does not.
        let row = split_cells("5555   PF55   AQUAMAX FINGERLING 300   FULL   25.10");
        assert!(!is_header_row(&row));
    }

    #[test]
    fn test_two_header_cells_not_enough() {
        let row = split_cells("LIST PRICE   FULL PALLET PRICE");
        assert!(!is_header_row(&row));
    }

    #[test]
    fn test_sparse_rows_dropped() {
        let fragment = Fragment {
            page_number: 1,
            rows: vec![
                split_cells("PRICE IN US DOLLAR   X"),
                split_cells("5555   PF55   AQUAMAX   25.10"),
            ],
        };
        let filtered = filter_fragment(fragment);
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0][0].text, "5555");
    }

    #[test]
    fn test_indented_sparse_row_kept_for_continuation_merge() {
        let fragment = Fragment {
            page_number: 2,
            rows: vec![
                split_cells("                                FINGERLING 400                27.45"),
                split_cells("7000   XC12   LAYENA   40 LB   18.00"),
            ],
        };
        let filtered = filter_fragment(fragment);
        assert_eq!(filtered.rows.len(), 2);
        assert_eq!(filtered.rows[0][0].text, "FINGERLING 400");
    }

    #[test]
    fn test_header_row_captured_once() {
        let fragment = Fragment {
            page_number: 1,
            rows: vec![
                split_cells("PRODUCT NUMBER   FORMULA CODE   LIST PRICE"),
                split_cells("5555   PF55   25.10"),
                split_cells("PRODUCT NUMBER   FORMULA CODE   LIST PRICE"),
            ],
        };
        let filtered = filter_fragment(fragment);
        assert!(filtered.header.is_some());
        assert_eq!(filtered.rows.len(), 1);
    }

    #[test]
    fn test_normalize_signature() {
        assert_eq!(
            normalize_signature("  Product   Desc.  "),
            "PRODUCT DESC"
        );
    }
}
