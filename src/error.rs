//! Error types for axiom-logic

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting logic from Axiom log files
#[derive(Error, Debug)]
pub enum AxiomLogicError {
    #[error("Failed to read log file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: PathBuf },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to write workbook to {path}")]
    WorkbookWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML generation error: {message}")]
    XmlGeneration { message: String },

    #[error("ZIP creation error: {message}")]
    ZipError { message: String },
}

impl AxiomLogicError {
    /// True for failures that only affect a single input file.
    pub fn is_file_access(&self) -> bool {
        matches!(self, AxiomLogicError::FileAccess { .. })
    }
}

impl From<zip::result::ZipError> for AxiomLogicError {
    fn from(err: zip::result::ZipError) -> Self {
        AxiomLogicError::ZipError {
            message: err.to_string(),
        }
    }
}
