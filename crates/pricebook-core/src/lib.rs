pub mod corrections;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod source;
pub mod store;

use corrections::CorrectionMap;
use error::PriceBookError;
use extraction::fragments::fragment_pages;
use extraction::PdfExtractor;
use model::Extraction;
use parsing::filter::filter_fragment;
use parsing::metadata::{scan_effective_date, scan_plant_location};
use parsing::numeric::{typed_row, NumericOptions};
use parsing::standardize::standardize;

/// Options for a price-list extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub numeric: NumericOptions,
    /// Optional product-number correction table, applied after
    /// standardization.
    pub corrections: Option<CorrectionMap>,
}

/// Main API entry point: extract one price-list PDF into canonical rows.
///
/// Sequences fragment extraction, header/noise filtering, standardization
/// and numeric normalization, with the metadata scanner running over the
/// same page text. Either a complete, fully-typed row set is returned
/// (row-level diagnostics riding along), or the call fails with a
/// document-level error — partial results are never returned.
pub fn extract_price_list(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    source: &str,
    options: &ExtractOptions,
) -> Result<Extraction, PriceBookError> {
    let pages = extractor.extract_pages(pdf_bytes)?;

    // Metadata first: a document whose plant/date cannot be resolved must
    // not be attributed to a partition, so no rows are produced at all.
    let effective_date = scan_effective_date(&pages)?;
    let plant_location = scan_plant_location(&pages)?;

    let fragments = fragment_pages(&pages);
    let filtered: Vec<_> = fragments.into_iter().map(filter_fragment).collect();

    let mut diagnostics = Vec::new();
    let aligned = standardize(&filtered, &mut diagnostics);

    let mut rows = Vec::with_capacity(aligned.len());
    for aligned_row in &aligned {
        let mut row = typed_row(
            aligned_row,
            &plant_location,
            effective_date,
            source,
            &options.numeric,
            &mut diagnostics,
        );
        if let Some(map) = &options.corrections {
            row.product_number = map.resolve(&row.product_number).to_string();
        }
        rows.push(row);
    }

    tracing::info!(
        source,
        plant = %plant_location,
        date = %effective_date,
        rows = rows.len(),
        diagnostics = diagnostics.len(),
        backend = extractor.backend_name(),
        "extracted price list"
    );

    Ok(Extraction {
        rows,
        plant_location,
        effective_date,
        diagnostics,
    })
}
