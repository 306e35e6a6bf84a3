//! Detection errors and upload incompatibility reasons.

use thiserror::Error;

/// Errors raised while loading classifier tables.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse classifier tables: {0}")]
    TableParse(#[from] toml::de::Error),

    #[error("Invalid classifier table '{table}': {message}")]
    InvalidTable { table: String, message: String },
}

/// Why a stored CV cannot be placed into a file-selection element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("File type {mime_type} is not accepted by this upload field (accepted: {})", .accepted.join(", "))]
    UnsupportedType {
        mime_type: String,
        accepted: Vec<String>,
    },

    #[error("File size {} exceeds the upload limit of {}", format_size(.size_bytes), format_size(.max_bytes))]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

pub(crate) fn format_size(bytes: &u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = *bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} bytes", bytes)
    }
}
