//! URL builder errors.

use common::CoreError;
use thiserror::Error;

/// Errors from URL construction.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("width must be positive, got {0}")]
    InvalidWidth(u32),

    #[error("height must be positive, got {0}")]
    InvalidHeight(u32),

    #[error("quality must be in 1..=100, got {0}")]
    InvalidQuality(u8),

    #[error("URL parse error: {0}")]
    Parse(#[from] url::ParseError),

    #[error("no streaming base URL configured")]
    StreamBaseMissing,

    #[error("streaming base URL does not accept path segments")]
    InvalidStreamBase,
}

impl From<UrlError> for CoreError {
    fn from(err: UrlError) -> Self {
        match err {
            UrlError::StreamBaseMissing => CoreError::configuration("streaming"),
            other => CoreError::validation(other.to_string()),
        }
    }
}
