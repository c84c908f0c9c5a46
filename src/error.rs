use std::io;

use thiserror::Error;

/// Failures raised by the extraction core.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("record is missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("invalid search pattern: {0}")]
    PatternSyntax(#[from] regex::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to write row: {0}")]
    Csv(#[from] csv::Error),
}

impl ExtractError {
    pub fn missing(field: &'static str) -> Self {
        ExtractError::MissingField { field }
    }
}
