use std::path::PathBuf;

use thiserror::Error;

/// Message reported for any empty field of a report submission.
///
/// The same text is used whatever the field, the offending field is only available through
/// [`ConfigValidationError::field`].
pub const MISSING_FIELD_MESSAGE: &str = "Please set a name";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{}", MISSING_FIELD_MESSAGE)]
pub struct ConfigValidationError {
    pub field: &'static str,
}

/// Failures that abort a report upload.
///
/// HTTP error statuses are not part of this list: any response from the report API counts as a
/// completed upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read report file at {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid report endpoint {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to send report: {0}")]
    Transport(#[from] reqwest::Error),
}
