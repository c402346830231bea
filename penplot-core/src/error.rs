/// Error types for mesh loading
use thiserror::Error;

/// Errors raised while reading mesh files
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Truncated or malformed STL data
    #[error("invalid stl data: {0}")]
    Stl(String),

    /// File extension is neither `.obj` nor `.stl`
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
