use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("runtime library not found{}", searched_suffix(.searched))]
    RuntimeLibraryNotFound { searched: Option<PathBuf> },
    #[error("unknown asset type: {0}")]
    UnknownAssetType(String),
    #[error("malformed {kind} record at index {index}: {reason}")]
    MalformedRecord {
        kind: String,
        index: usize,
        reason: String,
    },
    #[error("failed to copy {} to {}: {cause}", .source_path.display(), .destination.display())]
    CopyFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        cause: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

fn searched_suffix(searched: &Option<PathBuf>) -> String {
    match searched {
        Some(path) => format!(" (searched {})", path.display()),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
