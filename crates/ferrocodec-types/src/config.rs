//! Compression options
//!
//! Values here are validated (or clamped) when they are constructed, so an
//! adapter never has to re-check them at compress time.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Compression level requested by the caller
///
/// Each codec maps these onto its own native scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompressionLevel {
    /// Favour speed over ratio
    Fastest,
    /// Balance speed and ratio
    #[default]
    Optimal,
    /// Favour ratio over speed
    SmallestSize,
    /// Store only, where the format allows it
    NoCompression,
}

impl CompressionLevel {
    /// Every level, in declaration order
    pub const ALL: [CompressionLevel; 4] = [
        CompressionLevel::Fastest,
        CompressionLevel::Optimal,
        CompressionLevel::SmallestSize,
        CompressionLevel::NoCompression,
    ];

    /// Stable snake_case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Optimal => "optimal",
            Self::SmallestSize => "smallest_size",
            Self::NoCompression => "no_compression",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fastest" => Ok(Self::Fastest),
            "optimal" => Ok(Self::Optimal),
            "smallest_size" | "smallestsize" => Ok(Self::SmallestSize),
            "no_compression" | "nocompression" => Ok(Self::NoCompression),
            other => Err(Error::config(format!("Unknown compression level: {}", other))),
        }
    }
}

/// Buffer size used when streaming through a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub struct BufferSize(usize);

impl BufferSize {
    /// Default buffer size (80KB)
    pub const DEFAULT: usize = 80 * 1024;

    /// Create a new buffer size; zero is rejected
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            Err(Error::config("Buffer size must be a positive integer"))
        } else {
            Ok(Self(size))
        }
    }

    /// Get the buffer size value
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BufferSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<usize> for BufferSize {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        Self::new(size)
    }
}

impl From<BufferSize> for usize {
    fn from(size: BufferSize) -> Self {
        size.0
    }
}

/// Brotli sliding window size (log2 of the window in bytes)
///
/// Out-of-range input is clamped into `MIN..=MAX`, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u32", into = "u32"))]
pub struct BrotliWindow(u32);

impl BrotliWindow {
    /// Smallest window accepted by the encoder
    pub const MIN: u32 = 10;
    /// Largest window accepted by the encoder
    pub const MAX: u32 = 24;
    /// Default window
    pub const DEFAULT: u32 = 22;

    /// Create a window size, clamping into the valid range
    pub fn new(bits: u32) -> Self {
        Self(bits.clamp(Self::MIN, Self::MAX))
    }

    /// Get the effective window size
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BrotliWindow {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u32> for BrotliWindow {
    fn from(bits: u32) -> Self {
        Self::new(bits)
    }
}

impl From<BrotliWindow> for u32 {
    fn from(window: BrotliWindow) -> Self {
        window.0
    }
}

/// Options carried by a codec adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressionOptions {
    /// Level used when the caller does not pass one
    pub level: CompressionLevel,
    /// Streaming buffer size
    pub buffer_size: BufferSize,
    /// Brotli window, ignored by the other codecs
    pub brotli_window: BrotliWindow,
}

impl CompressionOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default level
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the streaming buffer size
    pub fn with_buffer_size(mut self, buffer_size: BufferSize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the Brotli window; the value is clamped
    pub fn with_brotli_window(mut self, bits: u32) -> Self {
        self.brotli_window = BrotliWindow::new(bits);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, 10)]
    #[case(0, 10)]
    #[case(10, 10)]
    #[case(16, 16)]
    #[case(24, 24)]
    #[case(99, 24)]
    #[case(u32::MAX, 24)]
    fn test_brotli_window_clamps(#[case] requested: u32, #[case] effective: u32) {
        assert_eq!(BrotliWindow::new(requested).get(), effective);
        assert_eq!(
            CompressionOptions::new()
                .with_brotli_window(requested)
                .brotli_window
                .get(),
            effective
        );
    }

    #[test]
    fn test_buffer_size_validation() {
        assert!(BufferSize::new(0).is_err());
        assert_eq!(BufferSize::new(1).unwrap().get(), 1);
        assert_eq!(BufferSize::default().get(), BufferSize::DEFAULT);
        assert!(BufferSize::try_from(0usize).is_err());
    }

    #[rstest]
    #[case("fastest", CompressionLevel::Fastest)]
    #[case("Optimal", CompressionLevel::Optimal)]
    #[case("smallest_size", CompressionLevel::SmallestSize)]
    #[case("SmallestSize", CompressionLevel::SmallestSize)]
    #[case("no-compression", CompressionLevel::NoCompression)]
    fn test_level_parsing(#[case] input: &str, #[case] expected: CompressionLevel) {
        assert_eq!(input.parse::<CompressionLevel>().unwrap(), expected);
    }

    #[test]
    fn test_level_round_trips_through_display() {
        for level in CompressionLevel::ALL {
            assert_eq!(level.to_string().parse::<CompressionLevel>().unwrap(), level);
        }
        assert!("maximum".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = CompressionOptions::default();
        assert_eq!(options.level, CompressionLevel::Optimal);
        assert_eq!(options.buffer_size.get(), BufferSize::DEFAULT);
        assert_eq!(options.brotli_window.get(), BrotliWindow::DEFAULT);
    }
}
