use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PifError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("label '{label}' not found in document")]
    LabelNotFound { label: String },

    #[error("no text found at the expected offset from label '{label}'")]
    NameNotFound { label: String },

    #[error("score '{score}' of parameter '{parameter}' is out of range")]
    ScoreOutOfRange { parameter: String, score: String },

    #[error("worksheet limit exceeded: {0}")]
    SheetLimit(String),

    #[error("invalid table settings: {0}")]
    InvalidTableSettings(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("layout cache error at {path}: {reason}")]
    Cache { path: PathBuf, reason: String },

    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: Box<PifError>,
    },

    #[error("{count} warning(s) reported and --strict is set")]
    StrictWarnings { count: usize },

    #[error("XLSX error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
