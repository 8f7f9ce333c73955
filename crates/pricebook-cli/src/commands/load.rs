use std::path::{Path, PathBuf};

use pricebook_core::error::PriceBookError;
use pricebook_core::extraction::pdftotext::PdftotextExtractor;
use pricebook_core::store::{PriceStore, SqliteStore};

pub fn run(
    pdf_file: PathBuf,
    db: &Path,
    corrections: Option<PathBuf>,
) -> Result<(), PriceBookError> {
    let options = super::options_with_corrections(corrections)?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let source = pdf_file.display().to_string();

    let extractor = PdftotextExtractor::new();
    let extraction =
        pricebook_core::extract_price_list(&pdf_bytes, &extractor, &source, &options)?;

    let mut store = SqliteStore::open(db)?;
    store.replace_partition(
        &extraction.rows,
        &extraction.plant_location,
        extraction.effective_date,
    )?;

    println!(
        "Loaded {} row(s) into partition ({}, {})",
        extraction.rows.len(),
        extraction.plant_location,
        extraction.effective_date
    );
    for d in &extraction.diagnostics {
        eprintln!("  warning: {}", d.detail);
    }

    Ok(())
}
