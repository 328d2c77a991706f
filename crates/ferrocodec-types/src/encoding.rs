//! Case-insensitive encoding name table
//!
//! Maps every accepted `Content-Encoding` token (canonical names plus the
//! historical aliases) to a [`CompressionAlgorithm`]. The table is built once
//! and never mutated; share it behind an `Arc`.

use crate::CompressionAlgorithm;
use std::collections::HashMap;

/// Aliases accepted in addition to the canonical wire names
const ALIASES: [(&str, CompressionAlgorithm); 2] = [
    ("brotli", CompressionAlgorithm::Brotli),
    ("zstandard", CompressionAlgorithm::Zstd),
];

/// Immutable name to algorithm mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingNameTable {
    entries: HashMap<String, CompressionAlgorithm>,
}

impl EncodingNameTable {
    /// Build the standard table: every canonical wire name (including the
    /// `none` sentinel) plus the `brotli` and `zstandard` aliases
    pub fn standard() -> Self {
        let canonical = CompressionAlgorithm::ALL
            .iter()
            .map(|algorithm| (algorithm.wire_name(), *algorithm));

        Self::from_entries(canonical.chain(ALIASES))
    }

    /// Build a table from explicit entries; keys are folded to ASCII lowercase
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, CompressionAlgorithm)>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, algorithm)| (name.trim().to_ascii_lowercase(), algorithm))
            .collect();
        Self { entries }
    }

    /// Look up a name, ignoring ASCII case and surrounding whitespace
    pub fn lookup(&self, name: &str) -> Option<CompressionAlgorithm> {
        let name = name.trim();
        if let Some(algorithm) = self.entries.get(name) {
            return Some(*algorithm);
        }
        // Only allocate when the caller did not already send lowercase.
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.entries.get(&name.to_ascii_lowercase()).copied();
        }
        None
    }

    /// Whether `name` is known to the table
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Iterate over all accepted names (lowercase), in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of accepted names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EncodingNameTable {
    fn default() -> Self {
        Self::standard()
    }
}
