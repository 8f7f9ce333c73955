pub mod extract;
pub mod ingest;
pub mod load;
pub mod query;

use std::path::PathBuf;

use pricebook_core::corrections::load_corrections;
use pricebook_core::error::PriceBookError;
use pricebook_core::ExtractOptions;

/// Build extraction options shared by all commands that parse a PDF.
fn options_with_corrections(
    corrections: Option<PathBuf>,
) -> Result<ExtractOptions, PriceBookError> {
    let mut options = ExtractOptions::default();
    if let Some(path) = corrections {
        options.corrections = Some(load_corrections(&path)?);
    }
    Ok(options)
}
