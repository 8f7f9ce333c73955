use std::path::PathBuf;

use crate::error::PriceBookError;

/// Remote or local store the price-list documents are published to.
///
/// The pipeline treats the source as opaque: list a folder, fetch a document
/// by identifier. Any failure here is fatal before extraction begins.
pub trait DocumentSource {
    /// List document identifiers in a folder, PDFs only.
    fn list(&self, folder: &str) -> Result<Vec<String>, PriceBookError>;

    /// Fetch a document's bytes by identifier.
    fn fetch(&self, identifier: &str) -> Result<Vec<u8>, PriceBookError>;
}

/// Document source backed by a local directory tree.
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalDirSource { root: root.into() }
    }
}

impl DocumentSource for LocalDirSource {
    fn list(&self, folder: &str) -> Result<Vec<String>, PriceBookError> {
        let dir = self.root.join(folder);
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            PriceBookError::SourceUnavailable(format!("cannot list {}: {}", dir.display(), e))
        })?;

        let mut identifiers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PriceBookError::SourceUnavailable(e.to_string()))?;
            let path = entry.path();
            let is_pdf = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if is_pdf {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if folder.is_empty() {
                        identifiers.push(name.to_string());
                    } else {
                        identifiers.push(format!("{}/{}", folder, name));
                    }
                }
            }
        }

        identifiers.sort();
        tracing::debug!(folder, count = identifiers.len(), "listed source documents");
        Ok(identifiers)
    }

    fn fetch(&self, identifier: &str) -> Result<Vec<u8>, PriceBookError> {
        let path = self.root.join(identifier);
        std::fs::read(&path).map_err(|e| {
            PriceBookError::SourceUnavailable(format!("cannot fetch {}: {}", path.display(), e))
        })
    }
}
