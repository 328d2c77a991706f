//! Result type alias for ferrocodec operations

use crate::Error;

/// Result type alias for ferrocodec operations
pub type Result<T> = std::result::Result<T, Error>;
