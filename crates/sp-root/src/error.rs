//! Error types for ROOT file reading.

use thiserror::Error;

/// Errors raised while reading a ROOT file.
#[derive(Error, Debug)]
pub enum RootError {
    /// I/O error while opening or mapping the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `root` magic.
    #[error("not a ROOT file (bad magic)")]
    BadMagic,

    /// A read ran past the end of the buffer.
    #[error("buffer underflow at offset {offset}: need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Read position.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes available.
        have: usize,
    },

    /// No object with this name (or path) exists.
    #[error("object not found: {0}")]
    KeyNotFound(String),

    /// The object exists but its class cannot be read.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),

    /// Malformed streamer data.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A compressed block could not be inflated.
    #[error("decompression error: {0}")]
    Decompression(String),
}

/// Result alias for `sp-root`.
pub type Result<T> = std::result::Result<T, RootError>;
