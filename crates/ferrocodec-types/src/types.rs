//! Codec identity shared by every ferrocodec crate

use std::fmt;

/// Compression algorithm
///
/// The discriminant is never used for dispatch or storage; identity is the
/// variant itself and its canonical wire name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CompressionAlgorithm {
    /// Identity transform, never negotiated on the wire
    #[default]
    None,
    /// gzip (RFC 1952)
    Gzip,
    /// Raw deflate (RFC 1951)
    Deflate,
    /// Brotli (RFC 7932)
    #[cfg_attr(feature = "serde", serde(rename = "br", alias = "brotli"))]
    Brotli,
    /// Snappy framing format
    Snappy,
    /// Zstandard
    #[cfg_attr(feature = "serde", serde(alias = "zstandard"))]
    Zstd,
}

impl CompressionAlgorithm {
    /// Every supported algorithm, sentinel first
    pub const ALL: [CompressionAlgorithm; 6] = [
        CompressionAlgorithm::None,
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Deflate,
        CompressionAlgorithm::Brotli,
        CompressionAlgorithm::Snappy,
        CompressionAlgorithm::Zstd,
    ];

    /// Canonical lowercase name as used in `Content-Encoding`
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Brotli => "br",
            Self::Snappy => "snappy",
            Self::Zstd => "zstd",
        }
    }

    /// Whether this is the identity sentinel
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_lowercase_and_unique() {
        let names: Vec<&str> = CompressionAlgorithm::ALL
            .iter()
            .map(|a| a.wire_name())
            .collect();

        for name in &names {
            assert_eq!(*name, name.to_ascii_lowercase());
        }

        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(CompressionAlgorithm::Brotli.to_string(), "br");
        assert_eq!(CompressionAlgorithm::Zstd.to_string(), "zstd");
        assert!(CompressionAlgorithm::None.is_none());
        assert!(!CompressionAlgorithm::Gzip.is_none());
    }
}
