//! Native codec strategies
//!
//! Each algorithm contributes exactly two capabilities: encode a reader into
//! a byte buffer, and wrap a reader in a decoding reader. Everything else
//! (ownership, buffering, error mapping, async) lives in the generic
//! [`CodecAdapter`](crate::CodecAdapter).

use ferrocodec_types::{CompressionAlgorithm, CompressionLevel, CompressionOptions};
use std::fmt;
use std::io::{self, BufReader, Read, Write};
use std::sync::Arc;

/// Capability object wrapping one third-party stream codec
pub trait NativeCodec: Send + Sync + fmt::Debug {
    /// Get the algorithm type
    fn algorithm(&self) -> CompressionAlgorithm;

    /// Encode everything `input` yields into `output`, returning the number
    /// of input bytes consumed
    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        level: CompressionLevel,
        options: &CompressionOptions,
    ) -> io::Result<u64>;

    /// Wrap `input` in a reader that yields decoded bytes
    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>>;
}

/// Native codec factory
pub struct NativeCodecFactory;

impl NativeCodecFactory {
    /// Create the native codec for the specified algorithm
    pub fn create(algorithm: CompressionAlgorithm) -> Arc<dyn NativeCodec> {
        match algorithm {
            CompressionAlgorithm::None => Arc::new(IdentityCodec),
            CompressionAlgorithm::Gzip => Arc::new(GzipCodec),
            CompressionAlgorithm::Deflate => Arc::new(DeflateCodec),
            CompressionAlgorithm::Brotli => Arc::new(BrotliCodec),
            CompressionAlgorithm::Snappy => Arc::new(SnappyCodec),
            CompressionAlgorithm::Zstd => Arc::new(ZstdCodec),
        }
    }

    /// Get all available algorithms
    pub fn all_algorithms() -> Vec<CompressionAlgorithm> {
        CompressionAlgorithm::ALL.to_vec()
    }
}

fn flate_level(level: CompressionLevel) -> flate2::Compression {
    match level {
        CompressionLevel::NoCompression => flate2::Compression::none(),
        CompressionLevel::Fastest => flate2::Compression::fast(),
        CompressionLevel::Optimal => flate2::Compression::default(),
        CompressionLevel::SmallestSize => flate2::Compression::best(),
    }
}

fn brotli_quality(level: CompressionLevel) -> u32 {
    match level {
        CompressionLevel::NoCompression => 0,
        CompressionLevel::Fastest => 1,
        CompressionLevel::Optimal => 6,
        CompressionLevel::SmallestSize => 11,
    }
}

// zstd has no stored mode; its cheapest level stands in for NoCompression.
fn zstd_level(level: CompressionLevel) -> i32 {
    match level {
        CompressionLevel::NoCompression | CompressionLevel::Fastest => 1,
        CompressionLevel::Optimal => 3,
        CompressionLevel::SmallestSize => 19,
    }
}

/// Identity codec
#[derive(Debug, Clone, Copy)]
pub struct IdentityCodec;

impl NativeCodec for IdentityCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::None
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        _level: CompressionLevel,
        _options: &CompressionOptions,
    ) -> io::Result<u64> {
        io::copy(input, output)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        _buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        Ok(input)
    }
}

/// gzip codec backed by `flate2`
#[derive(Debug, Clone, Copy)]
pub struct GzipCodec;

impl NativeCodec for GzipCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Gzip
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        level: CompressionLevel,
        _options: &CompressionOptions,
    ) -> io::Result<u64> {
        let mut encoder = flate2::write::GzEncoder::new(output, flate_level(level));
        let consumed = io::copy(input, &mut encoder)?;
        encoder.finish()?;
        Ok(consumed)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        let buffered = BufReader::with_capacity(buffer_size, input);
        Ok(Box::new(flate2::bufread::GzDecoder::new(buffered)))
    }
}

/// Raw deflate codec backed by `flate2`
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec;

impl NativeCodec for DeflateCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Deflate
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        level: CompressionLevel,
        _options: &CompressionOptions,
    ) -> io::Result<u64> {
        let mut encoder = flate2::write::DeflateEncoder::new(output, flate_level(level));
        let consumed = io::copy(input, &mut encoder)?;
        encoder.finish()?;
        Ok(consumed)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        let buffered = BufReader::with_capacity(buffer_size, input);
        Ok(Box::new(flate2::bufread::DeflateDecoder::new(buffered)))
    }
}

/// Brotli codec backed by the `brotli` crate
///
/// The only codec that reads [`CompressionOptions::brotli_window`].
#[derive(Debug, Clone, Copy)]
pub struct BrotliCodec;

impl NativeCodec for BrotliCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Brotli
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        level: CompressionLevel,
        options: &CompressionOptions,
    ) -> io::Result<u64> {
        let mut encoder = brotli::CompressorWriter::new(
            output,
            options.buffer_size.get(),
            brotli_quality(level),
            options.brotli_window.get(),
        );
        let consumed = io::copy(input, &mut encoder)?;
        encoder.flush()?;
        // into_inner writes the final meta-block
        encoder.into_inner();
        Ok(consumed)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(brotli::Decompressor::new(input, buffer_size)))
    }
}

/// Snappy framing-format codec backed by `snap`
#[derive(Debug, Clone, Copy)]
pub struct SnappyCodec;

impl NativeCodec for SnappyCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Snappy
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        _level: CompressionLevel,
        _options: &CompressionOptions,
    ) -> io::Result<u64> {
        let mut encoder = snap::write::FrameEncoder::new(output);
        let consumed = io::copy(input, &mut encoder)?;
        encoder.flush()?;
        Ok(consumed)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        _buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(snap::read::FrameDecoder::new(input)))
    }
}

/// Zstandard codec backed by `zstd`
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec;

impl NativeCodec for ZstdCodec {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Zstd
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        output: &mut Vec<u8>,
        level: CompressionLevel,
        _options: &CompressionOptions,
    ) -> io::Result<u64> {
        let mut encoder = zstd::stream::write::Encoder::new(output, zstd_level(level))?;
        let consumed = io::copy(input, &mut encoder)?;
        encoder.finish()?;
        Ok(consumed)
    }

    fn decoder<'a>(
        &self,
        input: Box<dyn Read + 'a>,
        buffer_size: usize,
    ) -> io::Result<Box<dyn Read + 'a>> {
        let buffered = BufReader::with_capacity(buffer_size, input);
        Ok(Box::new(zstd::stream::read::Decoder::with_buffer(buffered)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn encode(codec: &dyn NativeCodec, data: &[u8], level: CompressionLevel) -> Vec<u8> {
        let mut output = Vec::new();
        let consumed = codec
            .encode(&mut &data[..], &mut output, level, &CompressionOptions::default())
            .unwrap();
        assert_eq!(consumed, data.len() as u64);
        output
    }

    fn decode(codec: &dyn NativeCodec, data: &[u8]) -> Vec<u8> {
        let mut decoder = codec.decoder(Box::new(data), 4096).unwrap();
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).unwrap();
        output
    }

    #[rstest]
    fn test_native_round_trip(
        #[values(
            CompressionAlgorithm::None,
            CompressionAlgorithm::Gzip,
            CompressionAlgorithm::Deflate,
            CompressionAlgorithm::Brotli,
            CompressionAlgorithm::Snappy,
            CompressionAlgorithm::Zstd
        )]
        algorithm: CompressionAlgorithm,
        #[values(
            CompressionLevel::Fastest,
            CompressionLevel::Optimal,
            CompressionLevel::SmallestSize,
            CompressionLevel::NoCompression
        )]
        level: CompressionLevel,
    ) {
        let codec = NativeCodecFactory::create(algorithm);
        let data = b"Hello, world! This is a test string for compression.".repeat(10);

        let encoded = encode(codec.as_ref(), &data, level);
        assert_eq!(decode(codec.as_ref(), &encoded), data);
    }

    #[test]
    fn test_identity_is_byte_identical() {
        let data = b"not compressed at all";
        assert_eq!(encode(&IdentityCodec, data, CompressionLevel::Optimal), data);
        assert_eq!(decode(&IdentityCodec, data), data);
    }

    #[test]
    fn test_gzip_output_has_magic_header() {
        let encoded = encode(&GzipCodec, b"abc", CompressionLevel::Optimal);
        assert_eq!(&encoded[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_zstd_output_has_magic_header() {
        let encoded = encode(&ZstdCodec, b"abc", CompressionLevel::Optimal);
        assert_eq!(&encoded[..4], &[0x28, 0xb5, 0x2f, 0xfd]);
    }

    #[test]
    fn test_snappy_output_starts_with_stream_identifier() {
        let encoded = encode(&SnappyCodec, b"abc", CompressionLevel::Optimal);
        assert_eq!(&encoded[..10], b"\xff\x06\x00\x00sNaPpY");
    }

    #[test]
    fn test_compressible_data_shrinks() {
        let data = vec![b'a'; 64 * 1024];
        for algorithm in [
            CompressionAlgorithm::Gzip,
            CompressionAlgorithm::Deflate,
            CompressionAlgorithm::Brotli,
            CompressionAlgorithm::Snappy,
            CompressionAlgorithm::Zstd,
        ] {
            let codec = NativeCodecFactory::create(algorithm);
            let encoded = encode(codec.as_ref(), &data, CompressionLevel::Optimal);
            assert!(encoded.len() < data.len() / 10, "{} did not shrink", algorithm);
        }
    }

    #[test]
    fn test_factory_covers_every_algorithm() {
        let algorithms = NativeCodecFactory::all_algorithms();
        assert_eq!(algorithms.len(), 6);

        for algorithm in algorithms {
            assert_eq!(NativeCodecFactory::create(algorithm).algorithm(), algorithm);
        }
    }
}
