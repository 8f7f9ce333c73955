use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::model::{col, Diagnostic, DiagnosticKind, PriceRow};
use crate::parsing::standardize::{column_name, AlignedRow};

/// Options for numeric cell normalization.
#[derive(Debug, Clone)]
pub struct NumericOptions {
    /// Thousands separator to strip before parsing (locale-dependent).
    pub thousands_separator: char,
}

impl Default for NumericOptions {
    fn default() -> Self {
        NumericOptions {
            thousands_separator: ',',
        }
    }
}

/// Parse a raw price-list cell into a numeric value.
///
/// Handles formats like:
/// - "1,234.56" -> 1234.56 (thousands separators stripped)
/// - "(123)" -> -123 (parenthesized negatives)
/// - "123-" -> -123 (trailing-dash negatives)
/// - "$25.10" -> 25.10
/// - "" -> None (missing, not an error)
///
/// An unparseable cell returns Err with the reason; the caller records a
/// warning and treats the value as missing.
pub fn parse_amount(raw: &str, opts: &NumericOptions) -> Result<Option<Decimal>, String> {
    let mut s = raw.trim();

    if s.is_empty() || s == "-" || s == "n/a" || s == "N/A" {
        return Ok(None);
    }

    let mut negative = false;

    if s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].trim();
    } else if let Some(rest) = s.strip_suffix('-') {
        negative = true;
        s = rest.trim_end();
    }

    let s = s.strip_prefix('$').unwrap_or(s).trim();

    let cleaned: String = s.chars().filter(|&c| c != opts.thousands_separator).collect();

    let value = Decimal::from_str(&cleaned)
        .map_err(|e| format!("invalid number '{}': {}", raw.trim(), e))?;

    Ok(Some(if negative { -value } else { value }))
}

/// Convert an aligned text row into a fully-typed canonical row, attaching
/// the document-level metadata resolved by the scanner.
///
/// Text columns are trimmed; identifiers are preserved verbatim. Numeric
/// cells that fail to parse become missing values with a diagnostic.
pub fn typed_row(
    row: &AlignedRow,
    plant_location: &str,
    date_inserted: NaiveDate,
    source: &str,
    opts: &NumericOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> PriceRow {
    let text = |index: usize| -> Option<String> {
        let v = row.cells[index].trim();
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    };

    let mut number = |index: usize| -> Option<Decimal> {
        match parse_amount(&row.cells[index], opts) {
            Ok(v) => v,
            Err(reason) => {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::NumericParseWarning,
                    page_number: Some(row.page_number),
                    detail: format!("{}: {}", column_name(index), reason),
                });
                None
            }
        }
    };

    PriceRow {
        product_number: row.cells[col::PRODUCT_NUMBER].trim().to_string(),
        formula_code: text(col::FORMULA_CODE),
        product_name: text(col::PRODUCT_NAME),
        product_form: text(col::PRODUCT_FORM),
        unit_weight: text(col::UNIT_WEIGHT),
        pallet_quantity: number(col::PALLET_QUANTITY),
        stocking_status: text(col::STOCKING_STATUS),
        min_order_quantity: number(col::MIN_ORDER_QUANTITY),
        days_lead_time: number(col::DAYS_LEAD_TIME),
        fob_or_dlv: text(col::FOB_OR_DLV),
        price_change: number(col::PRICE_CHANGE),
        list_price: number(col::LIST_PRICE),
        full_pallet_price: number(col::FULL_PALLET_PRICE),
        half_load_full_pallet_price: number(col::HALF_LOAD_FULL_PALLET_PRICE),
        full_load_full_pallet_price: number(col::FULL_LOAD_FULL_PALLET_PRICE),
        full_load_best_price: number(col::FULL_LOAD_BEST_PRICE),
        plant_location: plant_location.to_string(),
        date_inserted,
        source: source.to_string(),
    }
}
