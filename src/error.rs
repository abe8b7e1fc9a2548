use std::path::PathBuf;

use thiserror::Error;

/// Malformed input that aborts the whole run
#[derive(Debug, Error, PartialEq)]
pub enum DataFormatError {
    #[error("{source_name}: missing required column `{column}`")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("{source_name}: row {row}: score `{value}` is not numeric")]
    InvalidScore {
        source_name: String,
        row: usize,
        value: String,
    },

    #[error("{source_name}: row {row}: difficulty level `{value}` is not numeric")]
    InvalidLevel {
        source_name: String,
        row: usize,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
