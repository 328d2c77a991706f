//! Unified test utilities for ferrocodec tests and benchmarks

use ferrocodec_compression::CodecRegistry;
use ferrocodec_types::{CompressionAlgorithm, CompressionLevel, Result};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Test data generation patterns
#[derive(Debug, Clone, Copy)]
pub enum TestDataPattern {
    /// All zeros - highly compressible
    Zeros,
    /// Deterministic pseudo-random data - incompressible
    Random,
    /// Repeated English text
    Text,
    /// Mixed compressible/incompressible data
    Mixed,
}

/// Generate test data with specified pattern
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Random => {
            // xorshift keeps the data reproducible between runs
            let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
            (0..size)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state >> 24) as u8
                })
                .collect()
        }
        TestDataPattern::Text => b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect(),
        TestDataPattern::Mixed => (0..size)
            .map(|i| match i % 1000 {
                0..=99 => 0,
                100..=199 => 255,
                _ => (i % 256) as u8,
            })
            .collect(),
    }
}

/// Apply `chain` in declaration order, as a sender would
pub fn encode_chain(
    registry: &CodecRegistry,
    data: &[u8],
    chain: &[CompressionAlgorithm],
) -> Result<Vec<u8>> {
    chain.iter().try_fold(data.to_vec(), |acc, algorithm| {
        registry
            .resolve(*algorithm)
            .compress(&acc, CompressionLevel::Optimal)
    })
}

/// Shared flag flipped when a [`TrackedStream`] is dropped
#[derive(Debug, Clone, Default)]
pub struct DropFlag(Arc<AtomicBool>);

impl DropFlag {
    /// Whether the stream has been dropped
    pub fn is_dropped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// In-memory stream that records when it is released
#[derive(Debug)]
pub struct TrackedStream {
    inner: Cursor<Vec<u8>>,
    flag: DropFlag,
}

impl TrackedStream {
    /// Wrap `data`; the returned flag observes the drop
    pub fn new(data: Vec<u8>) -> (Self, DropFlag) {
        let flag = DropFlag::default();
        let stream = Self {
            inner: Cursor::new(data),
            flag: flag.clone(),
        };
        (stream, flag)
    }

    /// Current read position
    pub fn position(&self) -> u64 {
        self.inner.position()
    }
}

impl Read for TrackedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for TrackedStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.flag.0.store(true, Ordering::SeqCst);
    }
}
