use crate::extraction::PageContent;

/// A single text cell within a raw table row.
///
/// `start` is the byte offset of the cell within its source line. pdftotext
/// -layout preserves column alignment with spaces, so cell offsets carry the
/// column geometry needed to align short rows later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub start: usize,
    pub text: String,
}

/// One row of raw text cells, prior to any filtering or alignment.
pub type RawRow = Vec<Cell>;

/// A table-shaped chunk of rows extracted from a single page, prior to
/// cross-page merging.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub page_number: usize,
    pub rows: Vec<RawRow>,
}

/// Minimum cells for a line to count as tabular on its own. Free-text
/// metadata lines ("Effective Date 01/06/25") use single spaces and yield
/// one cell.
const MIN_TABLE_CELLS: usize = 2;

/// Extract raw table fragments from every page.
///
/// A fragment is a maximal run of consecutive table-shaped lines. An
/// indented single-cell line bordered by tabular lines is a wrapped cell
/// from a row split across a page break, so it joins the run instead of
/// breaking it. Pages without detectable tabular structure contribute no
/// fragments; that is not an error.
pub fn fragment_pages(pages: &[PageContent]) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for page in pages {
        let rows: Vec<RawRow> = page.lines.iter().map(|l| split_cells(l)).collect();
        let tabular: Vec<bool> = (0..rows.len()).map(|i| is_tabular(&rows, i)).collect();

        let mut current: Vec<RawRow> = Vec::new();
        for (row, is_table_row) in rows.into_iter().zip(tabular) {
            if is_table_row {
                current.push(row);
            } else if !current.is_empty() {
                fragments.push(Fragment {
                    page_number: page.page_number,
                    rows: std::mem::take(&mut current),
                });
            }
        }

        if !current.is_empty() {
            fragments.push(Fragment {
                page_number: page.page_number,
                rows: current,
            });
        }
    }

    tracing::debug!(fragments = fragments.len(), "detected table fragments");

    fragments
}

fn is_tabular(rows: &[RawRow], i: usize) -> bool {
    let row = &rows[i];
    if row.len() >= MIN_TABLE_CELLS {
        return true;
    }

    // Wrapped-cell lines are indented off column zero; prose and metadata
    // lines start at it.
    let indented = row.len() == 1 && row[0].start > 0;
    let prev_tabular = i > 0 && rows[i - 1].len() >= MIN_TABLE_CELLS;
    let next_tabular = rows
        .get(i + 1)
        .map(|r| r.len() >= MIN_TABLE_CELLS)
        .unwrap_or(false);

    indented && (prev_tabular || next_tabular)
}

/// Split a line into cells on gaps of 2+ whitespace characters, recording
/// each cell's starting offset.
pub fn split_cells(line: &str) -> RawRow {
    let mut cells = Vec::new();
    let mut start: Option<usize> = None;
    let mut space_count = 0;
    let mut end = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some(s) = start.take() {
                    // exclude the first space of the gap
                    cells.push(Cell {
                        start: s,
                        text: line[s..end].to_string(),
                    });
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
            end = i + c.len_utf8();
        }
    }

    if let Some(s) = start {
        cells.push(Cell {
            start: s,
            text: line[s..end].trim_end().to_string(),
        });
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_split_cells_offsets() {
        let cells = split_cells("5555   PF55   AQUAMAX FINGERLING 300");
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].text, "5555");
        assert_eq!(cells[0].start, 0);
        assert_eq!(cells[1].text, "PF55");
        assert_eq!(cells[1].start, 7);
        assert_eq!(cells[2].text, "AQUAMAX FINGERLING 300");
    }

    #[test]
    fn test_single_space_text_is_one_cell() {
        let cells = split_cells("Effective Date 01/06/25");
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_fragment_run_broken_by_free_text() {
        let pages = vec![page(
            1,
            &[
                "Purina Animal Nutrition Price List",
                "5555   PF55   AQUAMAX    25.10",
                "5556   PF56   AQUAMAX    26.35",
                "",
                "Prices effective until further notice",
                "7001   XC12   LAYENA     18.00",
            ],
        )];

        let fragments = fragment_pages(&pages);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].rows.len(), 2);
        assert_eq!(fragments[1].rows.len(), 1);
        assert_eq!(fragments[1].page_number, 1);
    }

    #[test]
    fn test_indented_single_cell_line_joins_adjacent_table() {
        let pages = vec![page(
            1,
            &[
                "5555   PF55   AQUAMAX   25.10",
                "              FINGERLING 300",
                "5556   PF56   LAYENA    26.35",
            ],
        )];

        let fragments = fragment_pages(&pages);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].rows.len(), 3);
        assert_eq!(fragments[0].rows[1][0].text, "FINGERLING 300");
    }

    #[test]
    fn test_lone_indented_line_without_table_ignored() {
        let pages = vec![page(1, &["       Centered Title", "plain prose line"])];
        assert!(fragment_pages(&pages).is_empty());
    }

    #[test]
    fn test_page_without_tables_yields_no_fragments() {
        let pages = vec![page(1, &["Just a cover page", "with prose text"])];
        assert!(fragment_pages(&pages).is_empty());
    }
}
