use std::collections::HashMap;
use std::sync::LazyLock;

use crate::extraction::fragments::RawRow;
use crate::model::{col, Diagnostic, DiagnosticKind, CANONICAL_WIDTH, EXTRACTED_COLUMNS};
use crate::parsing::filter::{normalize_signature, FilteredFragment};

/// A data row aligned to the canonical 16-column width. Empty strings mark
/// missing cells; typing happens in the numeric normalizer.
#[derive(Debug, Clone)]
pub struct AlignedRow {
    pub page_number: usize,
    pub cells: Vec<String>,
}

/// Column-label variants seen across price-list vintages, keyed by their
/// normalized signature, mapped to the canonical column index.
static SYNONYMS: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("PRODUCT NUMBER", col::PRODUCT_NUMBER);
    m.insert("PRODUCT NO", col::PRODUCT_NUMBER);
    m.insert("ITEM NUMBER", col::PRODUCT_NUMBER);

    m.insert("FORMULA CODE", col::FORMULA_CODE);
    m.insert("FORMULA", col::FORMULA_CODE);

    m.insert("PRODUCT DESC", col::PRODUCT_NAME);
    m.insert("PRODUCT DESCRIPTION", col::PRODUCT_NAME);
    m.insert("PRODUCT NAME", col::PRODUCT_NAME);
    m.insert("DESCRIPTION", col::PRODUCT_NAME);

    m.insert("PRODUCT FORM", col::PRODUCT_FORM);
    m.insert("FORM", col::PRODUCT_FORM);

    m.insert("UNIT WEIGHT", col::UNIT_WEIGHT);
    m.insert("WEIGHT", col::UNIT_WEIGHT);

    m.insert("PALLET QUANTITY", col::PALLET_QUANTITY);
    m.insert("PALLET QTY", col::PALLET_QUANTITY);

    m.insert("STOCKING STATUS", col::STOCKING_STATUS);
    m.insert("STATUS", col::STOCKING_STATUS);

    m.insert("MIN ORDER QUANTITY", col::MIN_ORDER_QUANTITY);
    m.insert("MIN ORDER QTY", col::MIN_ORDER_QUANTITY);
    m.insert("MINIMUM ORDER QUANTITY", col::MIN_ORDER_QUANTITY);

    m.insert("DAYS LEAD TIME", col::DAYS_LEAD_TIME);
    m.insert("LEAD TIME DAYS", col::DAYS_LEAD_TIME);
    m.insert("LEAD TIME", col::DAYS_LEAD_TIME);

    m.insert("FOB OR DLV", col::FOB_OR_DLV);
    m.insert("FOB DLV", col::FOB_OR_DLV);
    m.insert("FOB", col::FOB_OR_DLV);

    m.insert("CHANGE IN PRICE", col::PRICE_CHANGE);
    m.insert("PRICE CHANGE", col::PRICE_CHANGE);

    m.insert("LIST PRICE", col::LIST_PRICE);
    m.insert("SINGLE UNIT LIST PRICE", col::LIST_PRICE);

    m.insert("FULL PALLET PRICE", col::FULL_PALLET_PRICE);
    m.insert("FULL PALLET LIST PRICE", col::FULL_PALLET_PRICE);

    m.insert("HALF LOAD FULL PALLET PRICE", col::HALF_LOAD_FULL_PALLET_PRICE);

    m.insert("FULL LOAD FULL PALLET PRICE", col::FULL_LOAD_FULL_PALLET_PRICE);

    m.insert("FULL LOAD BEST PRICE", col::FULL_LOAD_BEST_PRICE);
    m.insert("BEST NET LIST PRICE", col::FULL_LOAD_BEST_PRICE);

    m
});

/// One header cell resolved to a canonical column: where it starts in the
/// line, and which canonical index it feeds.
#[derive(Debug, Clone, Copy)]
struct ColumnTarget {
    start: usize,
    index: usize,
}

/// Merge filtered fragments from all pages into one aligned logical table.
///
/// A fragment carrying its own header row is aligned from that header, so a
/// later page that reorders or renames columns still lands data in the right
/// canonical slots. Header-less fragments (tables continuing across a page
/// break) reuse the most recent header; fragments before the first header
/// use the document's first. A document with tables but no recognizable
/// header anywhere cannot be aligned safely: every fragment is diagnosed as
/// a schema mismatch and dropped.
pub fn standardize(
    fragments: &[FilteredFragment],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<AlignedRow> {
    let first_header = fragments.iter().find_map(|f| f.header.as_ref());

    let Some(first_header) = first_header else {
        for fragment in fragments {
            if !fragment.rows.is_empty() {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::SchemaMismatch,
                    page_number: Some(fragment.page_number),
                    detail: format!(
                        "no header row in document; dropped fragment of {} row(s)",
                        fragment.rows.len()
                    ),
                });
            }
        }
        return Vec::new();
    };

    let mut map = column_mapping(first_header, diagnostics);

    let mut rows = Vec::new();
    for fragment in fragments {
        if let Some(header) = &fragment.header {
            // The first header's map is already built; later headers rebuild
            // it so this fragment aligns to its own column order.
            if !std::ptr::eq(header, first_header) {
                map = column_mapping(header, diagnostics);
            }
        }
        for row in &fragment.rows {
            let cells = align_row(row, &map, fragment.page_number, diagnostics);
            rows.push(AlignedRow {
                page_number: fragment.page_number,
                cells,
            });
        }
    }

    let merged = merge_continuations(rows);

    // Retained rows must carry an identifier; anything else is noise.
    merged
        .into_iter()
        .filter(|r| !r.cells[col::PRODUCT_NUMBER].is_empty())
        .collect()
}

/// Resolve header cells to canonical columns via the synonym map, falling
/// back to the cell's ordinal position for unrecognized labels.
fn column_mapping(header: &RawRow, diagnostics: &mut Vec<Diagnostic>) -> Vec<ColumnTarget> {
    let mut map = Vec::new();

    for (i, cell) in header.iter().enumerate() {
        let signature = normalize_signature(&cell.text);
        let index = match SYNONYMS.get(signature.as_str()) {
            Some(&idx) => idx,
            None if i < CANONICAL_WIDTH => i,
            None => {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::SchemaMismatch,
                    page_number: None,
                    detail: format!(
                        "header label '{}' beyond canonical width; column dropped",
                        cell.text
                    ),
                });
                continue;
            }
        };
        map.push(ColumnTarget {
            start: cell.start,
            index,
        });
    }

    map
}

/// Align one raw row to the canonical width.
///
/// Rows with the same cell count as the header zip positionally. Rows with a
/// different count (short page-break tails, collapsed empty columns) assign
/// each cell to the nearest header column by character offset, padding the
/// rest with missing values rather than shifting data into the wrong column.
fn align_row(
    row: &RawRow,
    map: &[ColumnTarget],
    page_number: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<String> {
    let mut cells = vec![String::new(); CANONICAL_WIDTH];

    if row.len() == map.len() {
        for (cell, target) in row.iter().zip(map) {
            place(&mut cells, target.index, cell.text.trim());
        }
        return cells;
    }

    diagnostics.push(Diagnostic {
        kind: DiagnosticKind::SchemaMismatch,
        page_number: Some(page_number),
        detail: format!(
            "row has {} cell(s), expected {}; aligned by column position",
            row.len(),
            map.len()
        ),
    });

    for cell in row {
        let nearest = map
            .iter()
            .min_by_key(|t| t.start.abs_diff(cell.start))
            .map(|t| t.index);
        if let Some(index) = nearest {
            place(&mut cells, index, cell.text.trim());
        }
    }

    cells
}

/// Write a cell value into its column, joining with a space if two raw cells
/// resolve to the same column.
fn place(cells: &mut [String], index: usize, text: &str) {
    if text.is_empty() {
        return;
    }
    if cells[index].is_empty() {
        cells[index] = text.to_string();
    } else {
        cells[index].push(' ');
        cells[index].push_str(text);
    }
}

/// Fold continuation rows into their predecessor.
///
/// A row lacking a populated product number but carrying data in trailing
/// columns is the tail of the previous row split across a page break.
fn merge_continuations(rows: Vec<AlignedRow>) -> Vec<AlignedRow> {
    let mut merged: Vec<AlignedRow> = Vec::new();

    for row in rows {
        let is_continuation = row.cells[col::PRODUCT_NUMBER].is_empty()
            && row.cells.iter().skip(1).any(|c| !c.is_empty());

        if is_continuation {
            if let Some(prev) = merged.last_mut() {
                for (target, cell) in prev.cells.iter_mut().zip(&row.cells) {
                    if cell.is_empty() {
                        continue;
                    }
                    if target.is_empty() {
                        *target = cell.clone();
                    } else {
                        target.push(' ');
                        target.push_str(cell);
                    }
                }
                continue;
            }
        }

        merged.push(row);
    }

    merged
}

/// Canonical name of an aligned column, for diagnostics.
pub fn column_name(index: usize) -> &'static str {
    EXTRACTED_COLUMNS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fragments::split_cells;

    fn fragment(page_number: usize, lines: &[&str]) -> FilteredFragment {
        let mut header = None;
        let mut rows = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let cells = split_cells(line);
            if i == 0 && crate::parsing::filter::is_header_row(&cells) {
                header = Some(cells);
            } else {
                rows.push(cells);
            }
        }
        FilteredFragment {
            page_number,
            header,
            rows,
        }
    }

    const HEADER: &str = "PRODUCT NUMBER   FORMULA CODE   PRODUCT DESC.   UNIT WEIGHT   LIST PRICE";

    #[test]
    fn test_synonym_alignment() {
        let mut diags = Vec::new();
        let frags = vec![fragment(
            1,
            &[
                HEADER,
                "5555             PF55           AQUAMAX 300     50 LB         25.10",
            ],
        )];
        let rows = standardize(&frags, &mut diags);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[col::PRODUCT_NUMBER], "5555");
        assert_eq!(rows[0].cells[col::FORMULA_CODE], "PF55");
        assert_eq!(rows[0].cells[col::PRODUCT_NAME], "AQUAMAX 300");
        assert_eq!(rows[0].cells[col::UNIT_WEIGHT], "50 LB");
        assert_eq!(rows[0].cells[col::LIST_PRICE], "25.10");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_short_row_padded_not_shifted() {
        // Missing the trailing list price: the other cells must stay in
        // their own columns and the price stays missing.
        let mut diags = Vec::new();
        let frags = vec![fragment(
            1,
            &[
                HEADER,
                "5555             PF55           AQUAMAX 300     50 LB",
            ],
        )];
        let rows = standardize(&frags, &mut diags);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[col::UNIT_WEIGHT], "50 LB");
        assert_eq!(rows[0].cells[col::LIST_PRICE], "");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SchemaMismatch);
    }

    #[test]
    fn test_continuation_row_merged_across_pages() {
        let mut diags = Vec::new();
        let frags = vec![
            fragment(
                1,
                &[
                    HEADER,
                    "5555             PF55           AQUAMAX",
                ],
            ),
            fragment(
                2,
                &[
                    "                                FINGERLING 300  50 LB         25.10",
                ],
            ),
        ];
        let rows = standardize(&frags, &mut diags);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[col::PRODUCT_NAME], "AQUAMAX FINGERLING 300");
        assert_eq!(rows[0].cells[col::LIST_PRICE], "25.10");
    }

    #[test]
    fn test_later_header_realigns_swapped_columns() {
        let mut diags = Vec::new();
        let frags = vec![
            fragment(
                1,
                &[
                    HEADER,
                    "5555             PF55           AQUAMAX 300     50 LB         25.10",
                ],
            ),
            fragment(
                2,
                &[
                    "FORMULA CODE     PRODUCT NUMBER    PRODUCT DESC.   UNIT WEIGHT   LIST PRICE",
                    "PF56             5556              LAYENA          40 LB         18.00",
                ],
            ),
        ];
        let rows = standardize(&frags, &mut diags);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cells[col::PRODUCT_NUMBER], "5556");
        assert_eq!(rows[1].cells[col::FORMULA_CODE], "PF56");
        assert_eq!(rows[1].cells[col::PRODUCT_NAME], "LAYENA");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_no_header_anywhere_drops_all_fragments() {
        let mut diags = Vec::new();
        let frags = vec![fragment(
            1,
            &["5555   PF55   AQUAMAX 300   50 LB   25.10"],
        )];
        let rows = standardize(&frags, &mut diags);
        assert!(rows.is_empty());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SchemaMismatch);
    }

    #[test]
    fn test_row_without_product_number_and_no_predecessor_dropped() {
        let mut diags = Vec::new();
        let frags = vec![fragment(
            1,
            &[
                HEADER,
                "                 PF55           ORPHAN TAIL     50 LB         25.10",
            ],
        )];
        let rows = standardize(&frags, &mut diags);
        assert!(rows.is_empty());
    }
}
