use std::path::Path;

use chrono::NaiveDate;

use pricebook_core::error::PriceBookError;
use pricebook_core::store::{PriceStore, SqliteStore};

use crate::output;

pub fn run(
    db: &Path,
    plant: &str,
    date: NaiveDate,
    output_format: &str,
) -> Result<(), PriceBookError> {
    let mut store = SqliteStore::open(db)?;
    let rows = store.query_partition(plant, date)?;

    match output_format {
        "json" => output::json::print(&rows)?,
        _ => {
            if rows.is_empty() {
                println!("No rows for partition ({plant}, {date})");
            } else {
                print!("{}", output::table::format_rows(&rows));
            }
        }
    }

    Ok(())
}
