use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PriceBookError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no effective date found in document text")]
    DateNotFound,

    #[error("no known plant location found in document text")]
    LocationNotFound,

    #[error("document source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("failed to load corrections from {path}: {reason}")]
    CorrectionsLoad { path: PathBuf, reason: String },

    #[error("invalid corrections file: {0}")]
    CorrectionsInvalid(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
