//! Core types, options and error handling for ferrocodec
//!
//! This crate provides the foundational types shared by every ferrocodec crate:
//!
//! - **Codec identity**: [`CompressionAlgorithm`] and its canonical wire names
//! - **Name resolution**: the immutable, case-insensitive [`EncodingNameTable`]
//! - **Options**: [`CompressionOptions`] with validated buffer size and clamped Brotli window
//! - **Error handling**: [`Error`] with kinds and severity levels
//! - **HTTP body abstraction**: [`HttpBody`] (feature `async`)
//!
//! # Features
//!
//! - `async` (default): Enable the [`HttpBody`] trait
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use ferrocodec_types::{CompressionAlgorithm, EncodingNameTable};
//!
//! let table = EncodingNameTable::standard();
//! assert_eq!(table.lookup("BR"), Some(CompressionAlgorithm::Brotli));
//! assert_eq!(table.lookup("zstandard"), Some(CompressionAlgorithm::Zstd));
//! assert_eq!(table.lookup("unsupported-xyz"), None);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod encoding;
pub mod error;
pub mod result;
#[cfg(feature = "async")]
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{BrotliWindow, BufferSize, CompressionLevel, CompressionOptions};
pub use encoding::EncodingNameTable;
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
#[cfg(feature = "async")]
pub use traits::{BodyStream, HttpBody, ReaderBody};
pub use types::CompressionAlgorithm;

#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;
