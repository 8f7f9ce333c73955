pub mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;

use crate::error::PriceBookError;
use crate::model::PriceRow;

/// Destination analytic store for canonical rows.
///
/// The unit of write is the partition: all rows sharing one
/// `(plant_location, date_inserted)` pair. Reloading a partition replaces it
/// entirely, so re-running extraction on a corrected document never produces
/// duplicate or mixed-vintage data.
pub trait PriceStore {
    /// Atomically delete any existing partition matching the key pair, then
    /// insert the given rows.
    fn replace_partition(
        &mut self,
        rows: &[PriceRow],
        plant_location: &str,
        date_inserted: NaiveDate,
    ) -> Result<(), PriceBookError>;

    /// The minimal read path: all 19 columns for one partition.
    fn query_partition(
        &mut self,
        plant_location: &str,
        date_inserted: NaiveDate,
    ) -> Result<Vec<PriceRow>, PriceBookError>;
}
