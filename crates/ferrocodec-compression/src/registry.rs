//! Codec registry
//!
//! Built once at start-up from an [`EncodingNameTable`] and a set of
//! [`CompressionOptions`], then shared read-only. Lookups come in two
//! flavours: soft (`Option`) for untrusted header values and hard (`Result`)
//! for explicit caller requests.

use crate::adapter::CodecAdapter;
use ferrocodec_types::{
    CompressionAlgorithm, CompressionOptions, EncodingNameTable, Error, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Immutable map from algorithm to its adapter
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    names: Arc<EncodingNameTable>,
    adapters: HashMap<CompressionAlgorithm, CodecAdapter>,
    fallback: CodecAdapter,
    options: CompressionOptions,
}

impl CodecRegistry {
    /// Build adapters for every supported algorithm
    pub fn new(names: Arc<EncodingNameTable>, options: CompressionOptions) -> Self {
        let adapters: HashMap<_, _> = CompressionAlgorithm::ALL
            .into_iter()
            .map(|algorithm| (algorithm, CodecAdapter::for_algorithm(algorithm, options)))
            .collect();
        let fallback = CodecAdapter::for_algorithm(CompressionAlgorithm::None, options);

        info!(
            "Codec registry ready: {} adapters, {} encoding names, level {}",
            adapters.len(),
            names.len(),
            options.level
        );

        Self {
            names,
            adapters,
            fallback,
            options,
        }
    }

    /// Registry over the standard name table with default options
    pub fn standard() -> Self {
        Self::new(
            Arc::new(EncodingNameTable::standard()),
            CompressionOptions::default(),
        )
    }

    /// Adapter for an algorithm; never fails
    pub fn resolve(&self, algorithm: CompressionAlgorithm) -> &CodecAdapter {
        self.adapters.get(&algorithm).unwrap_or(&self.fallback)
    }

    /// Adapter for an encoding name, or `None` when the name is unknown
    pub fn resolve_by_name(&self, name: &str) -> Option<&CodecAdapter> {
        self.names
            .lookup(name)
            .map(|algorithm| self.resolve(algorithm))
    }

    /// Adapter for an encoding name the caller requires to exist
    pub fn resolve_required_by_name(&self, name: &str) -> Result<&CodecAdapter> {
        self.resolve_by_name(name)
            .ok_or_else(|| Error::codec_not_available(name.trim()))
    }

    /// Canonical names of the codecs that can be negotiated on the wire
    pub fn supported_encodings(&self) -> Vec<&'static str> {
        CompressionAlgorithm::ALL
            .into_iter()
            .filter(|algorithm| !algorithm.is_none())
            .map(CompressionAlgorithm::wire_name)
            .collect()
    }

    /// Options every adapter was built with
    pub fn options(&self) -> &CompressionOptions {
        &self.options
    }

    /// Name table used for lookups
    pub fn names(&self) -> &EncodingNameTable {
        &self.names
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gzip", CompressionAlgorithm::Gzip)]
    #[case("GZIP", CompressionAlgorithm::Gzip)]
    #[case("Gzip", CompressionAlgorithm::Gzip)]
    #[case("br", CompressionAlgorithm::Brotli)]
    #[case("brotli", CompressionAlgorithm::Brotli)]
    #[case("zstandard", CompressionAlgorithm::Zstd)]
    #[case(" deflate ", CompressionAlgorithm::Deflate)]
    #[case("snappy", CompressionAlgorithm::Snappy)]
    #[case("none", CompressionAlgorithm::None)]
    fn test_resolve_by_name(#[case] name: &str, #[case] expected: CompressionAlgorithm) {
        let registry = CodecRegistry::standard();
        assert_eq!(registry.resolve_by_name(name).unwrap().algorithm(), expected);
    }

    #[test]
    fn test_unknown_name_is_soft_miss() {
        let registry = CodecRegistry::standard();
        assert!(registry.resolve_by_name("unsupported-xyz").is_none());
        assert!(registry.resolve_by_name("").is_none());
    }

    #[test]
    fn test_required_lookup_raises() {
        let registry = CodecRegistry::standard();
        let err = registry.resolve_required_by_name("lzma").unwrap_err();
        assert!(matches!(err, Error::CodecNotAvailable { ref name } if name == "lzma"));
        assert!(registry.resolve_required_by_name("ZSTD").is_ok());
    }

    #[test]
    fn test_resolve_is_total() {
        let registry = CodecRegistry::standard();
        for algorithm in CompressionAlgorithm::ALL {
            assert_eq!(registry.resolve(algorithm).algorithm(), algorithm);
        }
    }

    #[test]
    fn test_narrow_table_falls_back_softly() {
        let names = EncodingNameTable::from_entries([("gzip", CompressionAlgorithm::Gzip)]);
        let registry = CodecRegistry::new(Arc::new(names), CompressionOptions::default());

        assert!(registry.resolve_by_name("gzip").is_some());
        assert!(registry.resolve_by_name("br").is_none());
        assert_eq!(
            registry.resolve(CompressionAlgorithm::Brotli).algorithm(),
            CompressionAlgorithm::Brotli
        );
    }

    #[test]
    fn test_supported_encodings_exclude_none() {
        let registry = CodecRegistry::standard();
        assert_eq!(
            registry.supported_encodings(),
            vec!["gzip", "deflate", "br", "snappy", "zstd"]
        );
    }

    #[test]
    fn test_adapters_share_registry_options() {
        let options = CompressionOptions::default().with_brotli_window(5);
        let registry = CodecRegistry::new(Arc::new(EncodingNameTable::standard()), options);

        let brotli = registry.resolve(CompressionAlgorithm::Brotli);
        assert_eq!(brotli.options().brotli_window.get(), 10);
        assert_eq!(registry.options().brotli_window.get(), 10);
    }
}
