use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PriceBookError;

/// External data-correction table: product numbers that changed between
/// vintages, keyed old -> new. Loaded from a JSON file so corrections can be
/// updated without redeployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionMap {
    #[serde(default)]
    pub description: Option<String>,
    pub product_numbers: BTreeMap<String, String>,
}

impl CorrectionMap {
    /// Resolve a product number through the correction table.
    pub fn resolve<'a>(&'a self, product_number: &'a str) -> &'a str {
        self.product_numbers
            .get(product_number)
            .map(String::as_str)
            .unwrap_or(product_number)
    }
}

/// Load a correction map from a JSON file.
pub fn load_corrections(path: &Path) -> Result<CorrectionMap, PriceBookError> {
    let content = std::fs::read_to_string(path).map_err(|e| PriceBookError::CorrectionsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let map: CorrectionMap =
        serde_json::from_str(&content).map_err(|e| PriceBookError::CorrectionsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_corrections(&map)?;
    Ok(map)
}

/// Parse a correction map from a JSON string (no file path context).
pub fn parse_corrections_str(json: &str) -> Result<CorrectionMap, PriceBookError> {
    let map: CorrectionMap = serde_json::from_str(json).map_err(PriceBookError::Json)?;
    validate_corrections(&map)?;
    Ok(map)
}

/// Validate that a correction map is well-formed.
pub fn validate_corrections(map: &CorrectionMap) -> Result<(), PriceBookError> {
    for (from, to) in &map.product_numbers {
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(PriceBookError::CorrectionsInvalid(
                "product number mappings must not be empty".into(),
            ));
        }

        // A remap target that is itself remapped makes resolution
        // order-dependent; reject it.
        if map.product_numbers.contains_key(to) {
            return Err(PriceBookError::CorrectionsInvalid(format!(
                "'{}' maps to '{}', which is itself remapped",
                from, to
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_corrections() {
        let json = r#"{
            "description": "2025 renumbering",
            "product_numbers": { "5555": "5555A", "7001": "7010" }
        }"#;
        let map = parse_corrections_str(json).unwrap();
        assert_eq!(map.resolve("5555"), "5555A");
        assert_eq!(map.resolve("9999"), "9999");
    }

    #[test]
    fn test_empty_mapping_rejected() {
        let json = r#"{ "product_numbers": { "5555": "  " } }"#;
        assert!(parse_corrections_str(json).is_err());
    }

    #[test]
    fn test_chained_mapping_rejected() {
        let json = r#"{ "product_numbers": { "5555": "7001", "7001": "8002" } }"#;
        assert!(parse_corrections_str(json).is_err());
    }
}
