//! Error types for ShapePlot core.

use thiserror::Error;

/// ShapePlot core error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the ROOT reader
    #[error(transparent)]
    Root(#[from] sp_root::RootError),

    /// Inputs that cannot be combined or are malformed
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
