use std::path::{Path, PathBuf};

use tracing::{info, warn};

use pricebook_core::error::PriceBookError;
use pricebook_core::extraction::pdftotext::PdftotextExtractor;
use pricebook_core::source::{DocumentSource, LocalDirSource};
use pricebook_core::store::{PriceStore, SqliteStore};
use pricebook_core::ExtractOptions;

pub fn run(
    folder: PathBuf,
    db: &Path,
    corrections: Option<PathBuf>,
    halt_on_error: bool,
) -> Result<(), PriceBookError> {
    let options = super::options_with_corrections(corrections)?;
    let source = LocalDirSource::new(folder);
    let identifiers = source.list("")?;

    if identifiers.is_empty() {
        println!("No PDF documents found.");
        return Ok(());
    }

    let extractor = PdftotextExtractor::new();
    let mut store = SqliteStore::open(db)?;

    let mut loaded = 0usize;
    let mut skipped = 0usize;
    for identifier in &identifiers {
        match ingest_one(&source, identifier, &extractor, &mut store, &options) {
            Ok(rows) => {
                info!(document = %identifier, rows, "loaded");
                loaded += 1;
            }
            Err(e) if halt_on_error => return Err(e),
            Err(e) => {
                warn!(document = %identifier, error = %e, "skipping document");
                skipped += 1;
            }
        }
    }

    println!(
        "Ingested {loaded} of {} document(s), {skipped} skipped",
        identifiers.len()
    );
    Ok(())
}

fn ingest_one(
    source: &LocalDirSource,
    identifier: &str,
    extractor: &PdftotextExtractor,
    store: &mut SqliteStore,
    options: &ExtractOptions,
) -> Result<usize, PriceBookError> {
    let pdf_bytes = source.fetch(identifier)?;
    let extraction =
        pricebook_core::extract_price_list(&pdf_bytes, extractor, identifier, options)?;
    store.replace_partition(
        &extraction.rows,
        &extraction.plant_location,
        extraction.effective_date,
    )?;
    Ok(extraction.rows.len())
}
