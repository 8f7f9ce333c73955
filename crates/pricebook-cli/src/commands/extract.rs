use std::path::PathBuf;

use pricebook_core::error::PriceBookError;
use pricebook_core::extraction::pdftotext::PdftotextExtractor;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    corrections: Option<PathBuf>,
) -> Result<(), PriceBookError> {
    let options = super::options_with_corrections(corrections)?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let source = pdf_file.display().to_string();

    let extractor = PdftotextExtractor::new();
    let extraction =
        pricebook_core::extract_price_list(&pdf_bytes, &extractor, &source, &options)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&extraction)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} row(s) for {} {}, written to {}",
                extraction.rows.len(),
                extraction.plant_location,
                extraction.effective_date,
                path.display()
            );
            for d in &extraction.diagnostics {
                eprintln!("  warning: {}", d.detail);
            }
        }
        None => match output_format {
            "json" => output::json::print(&extraction)?,
            _ => print!("{}", output::table::format_extraction(&extraction)),
        },
    }

    Ok(())
}
