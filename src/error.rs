//! zipsat: a zip archive password cracker

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ZipsatError {
    #[error("Error opening zip file {}: {source}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Error reading wordlist file {}: {source}", .path.display())]
    WordlistLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
}
