use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::error::PriceBookError;
use crate::model::{PriceRow, STORAGE_COLUMNS};
use crate::store::PriceStore;

/// SQLite-backed price store.
///
/// Numeric columns are stored as exact-decimal TEXT rather than REAL so the
/// values round-trip losslessly; dates are ISO-8601 TEXT.
pub struct SqliteStore {
    conn: Connection,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS competitor_prices (
    product_number              TEXT NOT NULL,
    formula_code                TEXT,
    product_name                TEXT,
    product_form                TEXT,
    unit_weight                 TEXT,
    pallet_quantity             TEXT,
    stocking_status             TEXT,
    min_order_quantity          TEXT,
    days_lead_time              TEXT,
    fob_or_dlv                  TEXT,
    price_change                TEXT,
    list_price                  TEXT,
    full_pallet_price           TEXT,
    half_load_full_pallet_price TEXT,
    full_load_full_pallet_price TEXT,
    full_load_best_price        TEXT,
    plant_location              TEXT NOT NULL,
    date_inserted               TEXT NOT NULL,
    source                      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_competitor_prices_partition
    ON competitor_prices (plant_location, date_inserted);
";

impl SqliteStore {
    /// Open (and initialize if needed) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PriceBookError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::info!(path = %path.display(), "opened price store");
        Ok(SqliteStore { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, PriceBookError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }
}

impl PriceStore for SqliteStore {
    fn replace_partition(
        &mut self,
        rows: &[PriceRow],
        plant_location: &str,
        date_inserted: NaiveDate,
    ) -> Result<(), PriceBookError> {
        let date = date_inserted.to_string();
        let tx = self.conn.transaction()?;

        let deleted = tx.execute(
            "DELETE FROM competitor_prices WHERE plant_location = ?1 AND date_inserted = ?2",
            params![plant_location, date],
        )?;

        {
            let placeholders: Vec<String> =
                (1..=STORAGE_COLUMNS.len()).map(|i| format!("?{i}")).collect();
            let insert = format!(
                "INSERT INTO competitor_prices ({}) VALUES ({})",
                STORAGE_COLUMNS.join(", "),
                placeholders.join(", ")
            );
            let mut stmt = tx.prepare(&insert)?;

            for row in rows {
                stmt.execute(params![
                    row.product_number,
                    row.formula_code,
                    row.product_name,
                    row.product_form,
                    row.unit_weight,
                    row.pallet_quantity.map(|d| d.to_string()),
                    row.stocking_status,
                    row.min_order_quantity.map(|d| d.to_string()),
                    row.days_lead_time.map(|d| d.to_string()),
                    row.fob_or_dlv,
                    row.price_change.map(|d| d.to_string()),
                    row.list_price.map(|d| d.to_string()),
                    row.full_pallet_price.map(|d| d.to_string()),
                    row.half_load_full_pallet_price.map(|d| d.to_string()),
                    row.full_load_full_pallet_price.map(|d| d.to_string()),
                    row.full_load_best_price.map(|d| d.to_string()),
                    row.plant_location,
                    date,
                    row.source,
                ])?;
            }
        }

        tx.commit()?;

        tracing::info!(
            plant = plant_location,
            %date_inserted,
            replaced = deleted,
            inserted = rows.len(),
            "replaced partition"
        );

        Ok(())
    }

    fn query_partition(
        &mut self,
        plant_location: &str,
        date_inserted: NaiveDate,
    ) -> Result<Vec<PriceRow>, PriceBookError> {
        let mut stmt = self.conn.prepare(
            "SELECT product_number, formula_code, product_name, product_form,
                    unit_weight, pallet_quantity, stocking_status,
                    min_order_quantity, days_lead_time, fob_or_dlv,
                    price_change, list_price, full_pallet_price,
                    half_load_full_pallet_price, full_load_full_pallet_price,
                    full_load_best_price, plant_location, date_inserted, source
             FROM competitor_prices
             WHERE plant_location = ?1 AND date_inserted = ?2
             ORDER BY product_number",
        )?;

        let rows = stmt
            .query_map(params![plant_location, date_inserted.to_string()], |row| {
                let date_str: String = row.get(17)?;
                Ok(PriceRow {
                    product_number: row.get(0)?,
                    formula_code: row.get(1)?,
                    product_name: row.get(2)?,
                    product_form: row.get(3)?,
                    unit_weight: row.get(4)?,
                    pallet_quantity: decimal_col(row, 5)?,
                    stocking_status: row.get(6)?,
                    min_order_quantity: decimal_col(row, 7)?,
                    days_lead_time: decimal_col(row, 8)?,
                    fob_or_dlv: row.get(9)?,
                    price_change: decimal_col(row, 10)?,
                    list_price: decimal_col(row, 11)?,
                    full_pallet_price: decimal_col(row, 12)?,
                    half_load_full_pallet_price: decimal_col(row, 13)?,
                    full_load_full_pallet_price: decimal_col(row, 14)?,
                    full_load_best_price: decimal_col(row, 15)?,
                    plant_location: row.get(16)?,
                    date_inserted: parse_date(&date_str, 17)?,
                    source: row.get(18)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn decimal_col(row: &rusqlite::Row<'_>, idx: usize) -> Result<Option<Decimal>, rusqlite::Error> {
    let text: Option<String> = row.get(idx)?;
    text.map(|s| {
        Decimal::from_str(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn parse_date(s: &str, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    s.parse().map_err(|e: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_row(product_number: &str) -> PriceRow {
        PriceRow {
            product_number: product_number.to_string(),
            formula_code: Some("PF55".into()),
            product_name: Some("AQUAMAX FINGERLING 300".into()),
            product_form: Some("PELLET".into()),
            unit_weight: Some("50 LB".into()),
            pallet_quantity: Some(dec!(40)),
            stocking_status: Some("S".into()),
            min_order_quantity: Some(dec!(1)),
            days_lead_time: Some(dec!(3)),
            fob_or_dlv: Some("FOB".into()),
            price_change: Some(dec!(-0.45)),
            list_price: Some(dec!(25.10)),
            full_pallet_price: Some(dec!(24.30)),
            half_load_full_pallet_price: None,
            full_load_full_pallet_price: Some(dec!(23.15)),
            full_load_best_price: Some(dec!(22.90)),
            plant_location: "STATESVILLE".into(),
            date_inserted: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            source: "test.pdf".into(),
        }
    }

    #[test]
    fn test_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let rows = vec![sample_row("5555"), sample_row("7001")];

        store.replace_partition(&rows, "STATESVILLE", date).unwrap();
        let got = store.query_partition("STATESVILLE", date).unwrap();

        assert_eq!(got, rows);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let rows = vec![sample_row("5555")];

        store.replace_partition(&rows, "STATESVILLE", date).unwrap();
        store.replace_partition(&rows, "STATESVILLE", date).unwrap();

        let got = store.query_partition("STATESVILLE", date).unwrap();
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_other_partitions_untouched() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let jan = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let feb = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();

        store
            .replace_partition(&[sample_row("5555")], "STATESVILLE", jan)
            .unwrap();
        store
            .replace_partition(&[sample_row("5556")], "STATESVILLE", feb)
            .unwrap();
        store
            .replace_partition(&[sample_row("9001")], "STATESVILLE", jan)
            .unwrap();

        let jan_rows = store.query_partition("STATESVILLE", jan).unwrap();
        assert_eq!(jan_rows.len(), 1);
        assert_eq!(jan_rows[0].product_number, "9001");

        let feb_rows = store.query_partition("STATESVILLE", feb).unwrap();
        assert_eq!(feb_rows.len(), 1);
    }
}
