//! The single generic codec adapter
//!
//! A [`CodecAdapter`] pairs one [`NativeCodec`] strategy with the options it
//! was built with. It holds no per-call state, so one instance can be cloned
//! or shared across threads freely.
//!
//! Streams passed by value are consumed and dropped before the call returns.
//! Streams passed by `&mut` are left with the caller, rewound to the start.

use crate::algorithms::{NativeCodec, NativeCodecFactory};
use crate::lifecycle::{materialize, rewind_after};
use ferrocodec_types::{
    BufferSize, CompressionAlgorithm, CompressionLevel, CompressionOptions, Error, Result,
};
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;
use tracing::debug;

/// Uniform compress/decompress surface over one algorithm
#[derive(Debug, Clone)]
pub struct CodecAdapter {
    codec: Arc<dyn NativeCodec>,
    options: CompressionOptions,
}

impl CodecAdapter {
    /// Create an adapter around an existing codec strategy
    pub fn new(codec: Arc<dyn NativeCodec>, options: CompressionOptions) -> Self {
        Self { codec, options }
    }

    /// Create an adapter for a built-in algorithm
    pub fn for_algorithm(algorithm: CompressionAlgorithm, options: CompressionOptions) -> Self {
        Self::new(NativeCodecFactory::create(algorithm), options)
    }

    /// Algorithm handled by this adapter
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.codec.algorithm()
    }

    /// Canonical `Content-Encoding` token for this adapter
    pub fn encoding_name(&self) -> &'static str {
        self.algorithm().wire_name()
    }

    /// Options the adapter was built with
    pub fn options(&self) -> &CompressionOptions {
        &self.options
    }

    /// Compress a byte slice
    pub fn compress(&self, data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
        self.encode_from(&mut &data[..], level)
    }

    /// Compress the UTF-8 bytes of a string
    pub fn compress_str(&self, text: &str, level: CompressionLevel) -> Result<Vec<u8>> {
        self.compress(text.as_bytes(), level)
    }

    /// Compress a stream, consuming and releasing it
    pub fn compress_reader<R: Read>(&self, mut input: R, level: CompressionLevel) -> Result<Vec<u8>> {
        let result = self.encode_from(&mut input, level);
        drop(input);
        result
    }

    /// Compress a stream that stays with the caller; it is rewound afterwards
    pub fn compress_reader_leave_open<R: Read + Seek>(
        &self,
        input: &mut R,
        level: CompressionLevel,
    ) -> Result<Vec<u8>> {
        rewind_after(input, |input: &mut R| self.encode_from(input, level))
    }

    /// Compress a stream into a readable stream positioned at 0
    pub fn compress_to_stream<R: Read>(
        &self,
        input: R,
        level: CompressionLevel,
    ) -> Result<Cursor<Vec<u8>>> {
        self.compress_reader(input, level).map(materialize)
    }

    /// Like [`compress_to_stream`](Self::compress_to_stream), leaving the input open
    pub fn compress_to_stream_leave_open<R: Read + Seek>(
        &self,
        input: &mut R,
        level: CompressionLevel,
    ) -> Result<Cursor<Vec<u8>>> {
        self.compress_reader_leave_open(input, level).map(materialize)
    }

    /// Decompress a byte slice
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode_from(Box::new(data), self.options.buffer_size.get())
    }

    /// Decompress a byte slice using an explicit streaming buffer size
    pub fn decompress_with_buffer(&self, data: &[u8], buffer_size: BufferSize) -> Result<Vec<u8>> {
        self.decode_from(Box::new(data), buffer_size.get())
    }

    /// Decompress a byte slice and interpret the result as UTF-8
    pub fn decompress_to_string(&self, data: &[u8]) -> Result<String> {
        let bytes = self.decompress(data)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::decompression_failed(self.algorithm(), format!("invalid UTF-8 output: {e}"))
        })
    }

    /// Decompress a stream, consuming and releasing it
    pub fn decompress_reader<R: Read>(&self, input: R) -> Result<Vec<u8>> {
        // the boxed input is dropped inside decode_from on every path
        self.decode_from(Box::new(input), self.options.buffer_size.get())
    }

    /// Decompress a stream that stays with the caller; it is rewound afterwards
    pub fn decompress_reader_leave_open<R: Read + Seek>(&self, input: &mut R) -> Result<Vec<u8>> {
        let buffer_size = self.options.buffer_size.get();
        rewind_after(input, |input: &mut R| {
            self.decode_from(Box::new(&mut *input), buffer_size)
        })
    }

    /// Decompress a stream into a readable stream positioned at 0
    pub fn decompress_to_stream<R: Read>(
        &self,
        input: R,
        buffer_size: BufferSize,
    ) -> Result<Cursor<Vec<u8>>> {
        self.decode_from(Box::new(input), buffer_size.get())
            .map(materialize)
    }

    /// Like [`decompress_to_stream`](Self::decompress_to_stream), leaving the input open
    pub fn decompress_to_stream_leave_open<R: Read + Seek>(
        &self,
        input: &mut R,
        buffer_size: BufferSize,
    ) -> Result<Cursor<Vec<u8>>> {
        rewind_after(input, |input: &mut R| {
            self.decode_from(Box::new(&mut *input), buffer_size.get())
        })
        .map(materialize)
    }

    fn encode_from(&self, input: &mut dyn Read, level: CompressionLevel) -> Result<Vec<u8>> {
        let algorithm = self.algorithm();
        let mut output = Vec::new();
        let consumed = self
            .codec
            .encode(input, &mut output, level, &self.options)
            .map_err(|e| Error::compression(format!("{algorithm} compression failed: {e}")))?;

        debug!(
            "Compressed {} bytes to {} bytes with {} at {}",
            consumed,
            output.len(),
            algorithm,
            level
        );
        Ok(output)
    }

    fn decode_from<'a>(&self, input: Box<dyn Read + 'a>, buffer_size: usize) -> Result<Vec<u8>> {
        let algorithm = self.algorithm();
        let fail = |e: std::io::Error| Error::decompression_failed(algorithm, e.to_string());

        let mut decoder = self.codec.decoder(input, buffer_size).map_err(fail)?;
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).map_err(fail)?;
        drop(decoder);

        debug!("Decompressed {} bytes with {}", output.len(), algorithm);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    const SAMPLE: &[u8] = b"The quick brown fox jumps over the lazy dog. \
        The quick brown fox jumps over the lazy dog. \
        The quick brown fox jumps over the lazy dog.";

    struct TrackedReader {
        inner: Cursor<Vec<u8>>,
        dropped: Rc<Cell<bool>>,
    }

    impl Read for TrackedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    fn tracked(data: Vec<u8>) -> (TrackedReader, Rc<Cell<bool>>) {
        let dropped = Rc::new(Cell::new(false));
        let reader = TrackedReader {
            inner: Cursor::new(data),
            dropped: Rc::clone(&dropped),
        };
        (reader, dropped)
    }

    fn adapter(algorithm: CompressionAlgorithm) -> CodecAdapter {
        CodecAdapter::for_algorithm(algorithm, CompressionOptions::default())
    }

    #[rstest]
    fn test_round_trip_all_codecs(
        #[values(
            CompressionAlgorithm::None,
            CompressionAlgorithm::Gzip,
            CompressionAlgorithm::Deflate,
            CompressionAlgorithm::Brotli,
            CompressionAlgorithm::Snappy,
            CompressionAlgorithm::Zstd
        )]
        algorithm: CompressionAlgorithm,
    ) {
        let adapter = adapter(algorithm);
        let compressed = adapter.compress(SAMPLE, CompressionLevel::Optimal).unwrap();
        assert_eq!(adapter.decompress(&compressed).unwrap(), SAMPLE);
    }

    #[test]
    fn test_none_is_identity_both_ways() {
        let adapter = adapter(CompressionAlgorithm::None);
        assert_eq!(adapter.compress(SAMPLE, CompressionLevel::SmallestSize).unwrap(), SAMPLE);
        assert_eq!(adapter.decompress(SAMPLE).unwrap(), SAMPLE);
    }

    #[test]
    fn test_compress_str_and_decompress_to_string() {
        let adapter = adapter(CompressionAlgorithm::Brotli);
        let compressed = adapter.compress_str("héllo wörld", CompressionLevel::Fastest).unwrap();
        assert_eq!(adapter.decompress_to_string(&compressed).unwrap(), "héllo wörld");
    }

    #[test]
    fn test_decompress_to_string_rejects_invalid_utf8() {
        let adapter = adapter(CompressionAlgorithm::Gzip);
        let compressed = adapter.compress(&[0xff, 0xfe, 0xfd], CompressionLevel::Optimal).unwrap();

        let err = adapter.decompress_to_string(&compressed).unwrap_err();
        assert!(matches!(
            err,
            Error::DecompressionFailed {
                algorithm: CompressionAlgorithm::Gzip,
                ..
            }
        ));
    }

    #[test]
    fn test_owned_input_is_dropped() {
        let adapter = adapter(CompressionAlgorithm::Zstd);
        let (reader, dropped) = tracked(SAMPLE.to_vec());

        let compressed = adapter.compress_reader(reader, CompressionLevel::Optimal).unwrap();
        assert!(dropped.get());

        let (reader, dropped) = tracked(compressed);
        let stream = adapter
            .decompress_to_stream(reader, BufferSize::default())
            .unwrap();
        assert!(dropped.get());
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.into_inner(), SAMPLE);
    }

    #[test]
    fn test_owned_input_is_dropped_on_failure() {
        let adapter = adapter(CompressionAlgorithm::Gzip);
        let (reader, dropped) = tracked(b"definitely not gzip".to_vec());

        assert!(adapter.decompress_reader(reader).is_err());
        assert!(dropped.get());
    }

    #[test]
    fn test_leave_open_rewinds_input() {
        let adapter = adapter(CompressionAlgorithm::Deflate);
        let mut input = Cursor::new(SAMPLE.to_vec());

        let compressed = adapter
            .compress_to_stream_leave_open(&mut input, CompressionLevel::Optimal)
            .unwrap();
        assert_eq!(input.position(), 0);
        assert_eq!(compressed.position(), 0);

        let mut encoded = Cursor::new(compressed.into_inner());
        let restored = adapter
            .decompress_to_stream_leave_open(&mut encoded, BufferSize::default())
            .unwrap();
        assert_eq!(encoded.position(), 0);
        assert_eq!(restored.into_inner(), SAMPLE);
    }

    #[test]
    fn test_leave_open_rewinds_after_failure() {
        let adapter = adapter(CompressionAlgorithm::Zstd);
        let mut input = Cursor::new(b"not a zstd frame at all".to_vec());

        assert!(adapter.decompress_reader_leave_open(&mut input).is_err());
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_decompress_with_small_buffer() {
        let adapter = adapter(CompressionAlgorithm::Gzip);
        let compressed = adapter.compress(SAMPLE, CompressionLevel::Optimal).unwrap();
        let buffer = BufferSize::new(16).unwrap();

        assert_eq!(adapter.decompress_with_buffer(&compressed, buffer).unwrap(), SAMPLE);
    }

    #[test]
    fn test_adapter_reports_identity() {
        let adapter = adapter(CompressionAlgorithm::Brotli);
        assert_eq!(adapter.algorithm(), CompressionAlgorithm::Brotli);
        assert_eq!(adapter.encoding_name(), "br");
        assert_eq!(adapter.options().brotli_window.get(), 22);
    }
}
