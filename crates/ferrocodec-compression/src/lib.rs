//! Uniform compression codecs for ferrocodec
//!
//! This crate puts six codecs behind one contract and undoes HTTP
//! `Content-Encoding` chains with them. It includes:
//!
//! - **Codec strategies**: native gzip, deflate, brotli, snappy and zstd streams plus identity
//! - **One generic adapter**: [`CodecAdapter`] with sync and async call shapes
//! - **Registry**: [`CodecRegistry`] with soft and hard name lookups
//! - **Pipeline**: [`DecompressionPipeline`] decoding encoding chains in reverse
//!
//! # Stream ownership
//!
//! Methods taking a stream by value consume it and release it before they
//! return. Methods suffixed `_leave_open` borrow the stream and rewind it to
//! the start afterwards. Returned streams are always positioned at 0.
//!
//! # Examples
//!
//! ```rust
//! use ferrocodec_compression::{CodecRegistry, DecompressionPipeline};
//! use ferrocodec_types::{CompressionAlgorithm, CompressionLevel};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(CodecRegistry::standard());
//! let gzip = registry.resolve(CompressionAlgorithm::Gzip);
//! let brotli = registry.resolve_by_name("BR").unwrap();
//!
//! let body = gzip.compress(b"Hello, World!", CompressionLevel::Optimal)?;
//! let body = brotli.compress(&body, CompressionLevel::Optimal)?;
//!
//! let pipeline = DecompressionPipeline::new(Arc::clone(&registry));
//! let decoded = pipeline.apply(&["gzip", "br"], &body[..])?;
//! assert_eq!(decoded.into_inner(), b"Hello, World!");
//! # Ok::<(), ferrocodec_types::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod algorithms;
pub mod lifecycle;
pub mod pipeline;
pub mod registry;
pub mod streaming;


// Re-export main types
pub use adapter::CodecAdapter;
pub use algorithms::{NativeCodec, NativeCodecFactory};
pub use pipeline::{parse_content_encoding, ContentDecoding, DecompressionPipeline, HttpContent};
pub use registry::CodecRegistry;
