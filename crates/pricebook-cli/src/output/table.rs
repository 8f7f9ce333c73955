use std::fmt::Write;

use pricebook_core::model::{Extraction, PriceRow};

/// Render one extraction as a plain-text summary plus a row table.
pub fn format_extraction(extraction: &Extraction) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Plant: {}   Effective date: {}   Rows: {}",
        extraction.plant_location,
        extraction.effective_date,
        extraction.rows.len()
    );
    let _ = writeln!(out);
    out.push_str(&format_rows(&extraction.rows));

    if !extraction.diagnostics.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} warning(s):", extraction.diagnostics.len());
        for d in &extraction.diagnostics {
            match d.page_number {
                Some(page) => {
                    let _ = writeln!(out, "  page {page}: {}", d.detail);
                }
                None => {
                    let _ = writeln!(out, "  {}", d.detail);
                }
            }
        }
    }

    out
}

/// Render rows as an aligned table of the most commonly inspected columns.
pub fn format_rows(rows: &[PriceRow]) -> String {
    let mut out = String::new();

    let name_width = rows
        .iter()
        .filter_map(|r| r.product_name.as_ref().map(|n| n.len()))
        .max()
        .unwrap_or(12)
        .max("Product name".len());
    let number_width = rows
        .iter()
        .map(|r| r.product_number.len())
        .max()
        .unwrap_or(8)
        .max("Number".len());

    let _ = writeln!(
        out,
        "{:<number_width$}  {:<8}  {:<name_width$}  {:<10}  {:>10}  {:>10}",
        "Number", "Formula", "Product name", "Weight", "List", "Best"
    );

    for row in rows {
        let _ = writeln!(
            out,
            "{:<number_width$}  {:<8}  {:<name_width$}  {:<10}  {:>10}  {:>10}",
            row.product_number,
            text(&row.formula_code),
            text(&row.product_name),
            text(&row.unit_weight),
            amount(&row.list_price),
            amount(&row.full_load_best_price),
        );
    }

    out
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn amount(value: &Option<rust_decimal::Decimal>) -> String {
    match value {
        Some(d) => d.to_string(),
        None => "-".to_string(),
    }
}
