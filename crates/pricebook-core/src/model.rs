use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The 16 columns extracted from the PDF tables, in canonical order.
pub const EXTRACTED_COLUMNS: [&str; 16] = [
    "product_number",
    "formula_code",
    "product_name",
    "product_form",
    "unit_weight",
    "pallet_quantity",
    "stocking_status",
    "min_order_quantity",
    "days_lead_time",
    "fob_or_dlv",
    "price_change",
    "list_price",
    "full_pallet_price",
    "half_load_full_pallet_price",
    "full_load_full_pallet_price",
    "full_load_best_price",
];

/// Canonical table width before metadata columns are attached.
pub const CANONICAL_WIDTH: usize = EXTRACTED_COLUMNS.len();

/// Full 19-column storage order. Column order and names are part of the
/// storage contract; the destination table must match exactly.
pub const STORAGE_COLUMNS: [&str; 19] = [
    "product_number",
    "formula_code",
    "product_name",
    "product_form",
    "unit_weight",
    "pallet_quantity",
    "stocking_status",
    "min_order_quantity",
    "days_lead_time",
    "fob_or_dlv",
    "price_change",
    "list_price",
    "full_pallet_price",
    "half_load_full_pallet_price",
    "full_load_full_pallet_price",
    "full_load_best_price",
    "plant_location",
    "date_inserted",
    "source",
];

/// Columns that carry numeric values after normalization.
pub const NUMERIC_COLUMNS: [&str; 9] = [
    "pallet_quantity",
    "min_order_quantity",
    "days_lead_time",
    "price_change",
    "list_price",
    "full_pallet_price",
    "half_load_full_pallet_price",
    "full_load_full_pallet_price",
    "full_load_best_price",
];

/// Cell indices into an aligned 16-cell row.
pub(crate) mod col {
    pub const PRODUCT_NUMBER: usize = 0;
    pub const FORMULA_CODE: usize = 1;
    pub const PRODUCT_NAME: usize = 2;
    pub const PRODUCT_FORM: usize = 3;
    pub const UNIT_WEIGHT: usize = 4;
    pub const PALLET_QUANTITY: usize = 5;
    pub const STOCKING_STATUS: usize = 6;
    pub const MIN_ORDER_QUANTITY: usize = 7;
    pub const DAYS_LEAD_TIME: usize = 8;
    pub const FOB_OR_DLV: usize = 9;
    pub const PRICE_CHANGE: usize = 10;
    pub const LIST_PRICE: usize = 11;
    pub const FULL_PALLET_PRICE: usize = 12;
    pub const HALF_LOAD_FULL_PALLET_PRICE: usize = 13;
    pub const FULL_LOAD_FULL_PALLET_PRICE: usize = 14;
    pub const FULL_LOAD_BEST_PRICE: usize = 15;
}

/// One competitor price observation, conforming to the canonical 19-column
/// schema. Every row from a single extraction shares the same
/// `plant_location`, `date_inserted` and `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub product_number: String,
    pub formula_code: Option<String>,
    pub product_name: Option<String>,
    pub product_form: Option<String>,
    pub unit_weight: Option<String>,
    pub pallet_quantity: Option<Decimal>,
    pub stocking_status: Option<String>,
    pub min_order_quantity: Option<Decimal>,
    pub days_lead_time: Option<Decimal>,
    pub fob_or_dlv: Option<String>,
    pub price_change: Option<Decimal>,
    pub list_price: Option<Decimal>,
    pub full_pallet_price: Option<Decimal>,
    pub half_load_full_pallet_price: Option<Decimal>,
    pub full_load_full_pallet_price: Option<Decimal>,
    pub full_load_best_price: Option<Decimal>,
    pub plant_location: String,
    pub date_inserted: NaiveDate,
    pub source: String,
}

/// Severity-tagged, row-level issue recovered during extraction.
///
/// Diagnostics never abort a document; they ride along on the successful
/// result so the caller can decide whether the row set is trustworthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A fragment could not be aligned to the canonical width.
    SchemaMismatch,
    /// A cell in a numeric column could not be parsed; value recorded as missing.
    NumericParseWarning,
}

/// Result of extracting one document: the full typed row set plus the
/// document-level metadata resolved by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub rows: Vec<PriceRow>,
    pub plant_location: String,
    pub effective_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}
