//! ferrocodec testing suite
//!
//! Shared fixtures for the cross-crate integration tests and the criterion
//! benchmarks.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Data generators, encoding helpers and drop-tracking streams used by the
/// integration tests and benchmarks.
pub mod test_utils;

pub use test_utils::{encode_chain, generate_test_data, DropFlag, TestDataPattern, TrackedStream};
