//! Error types for the printsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for printsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading jobs or exporting documents.
///
/// Layout itself never fails: unsupported content and invalid options are
/// absorbed where they occur. What remains here are I/O and serialization
/// failures that terminate an export.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The export job file is structurally invalid.
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    /// Error during rendering of an output format.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error encoding a raster page image.
    #[error("Image encoding error: {0}")]
    Encode(String),

    /// Error packing the word-processor container.
    #[error("Archive error: {0}")]
    Archive(String),

    /// An image reference could not be resolved or decoded.
    #[error("Failed to load image '{0}': {1}")]
    ImageLoad(String, String),

    /// No exporter is registered for the requested format.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// An artifact name that would resolve outside the output directory.
    #[error("Unsafe output file name: {0}")]
    UnsafeFileName(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "docx")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("pptx".into());
        assert_eq!(err.to_string(), "Unsupported export format: pptx");

        let err = Error::ImageLoad("img/1.png".into(), "not found".into());
        assert_eq!(err.to_string(), "Failed to load image 'img/1.png': not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
