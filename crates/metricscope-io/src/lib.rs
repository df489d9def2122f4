pub mod csv_io;
pub mod json_io;

pub use csv_io::*;
pub use json_io::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IoResult<T> = Result<T, IoError>;
