use std::path::PathBuf;

use ced_core::SchemaError;
use thiserror::Error;

/// Unrecoverable failure reading or writing a table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("source {name:?}: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
