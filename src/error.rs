//! Error types for the pdfoutline library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The input document is unreadable or structurally corrupt.
    #[error("Malformed document {}: {cause}", path.display())]
    MalformedDocument {
        /// Path of the offending file (empty for in-memory input)
        path: PathBuf,
        /// Underlying parse failure
        cause: String,
    },

    /// Layout extraction produced no usable geometry for the whole document.
    #[error("Layout extraction failed: {0}")]
    Extraction(String),

    /// The labeling stage was invoked without a loaded model.
    #[error("Sequence model not loaded: configure a model before labeling")]
    ModelNotLoaded,

    /// The model artifact's feature schema does not match this build.
    #[error("Feature schema mismatch: model expects [{expected}], encoder produces [{found}]")]
    SchemaMismatch {
        /// Schema recorded in the model artifact
        expected: String,
        /// Schema this crate's encoder produces
        found: String,
    },

    /// The model artifact could not be read or deserialized.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Error serializing the outline to JSON.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::MalformedDocument {
                path: PathBuf::new(),
                cause: err.to_string(),
            },
        }
    }
}

impl Error {
    /// Attach an input path to a malformed-document error.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Error::MalformedDocument { cause, .. } => Error::MalformedDocument {
                path: path.into(),
                cause,
            },
            other => other,
        }
    }
}
