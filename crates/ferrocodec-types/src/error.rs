//! Error types and handling for ferrocodec
//!
//! Lookup by name is the only soft failure in the system and is modelled as
//! `Option`; everything here is a hard failure that the caller must see.

use crate::CompressionAlgorithm;

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - operation can continue
    Low,
    /// Medium severity - operation should be retried
    Medium,
    /// High severity - operation should be aborted
    High,
    /// Critical severity - entire process should be terminated
    Critical,
}

/// Main error type for ferrocodec operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation on a caller-supplied stream failed
    #[error("I/O error: {message}")]
    Io {
        /// Kind reported by the failing I/O operation
        io_kind: std::io::ErrorKind,
        /// Error message from the I/O operation
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Encoding side failure
    #[error("Compression error: {message}")]
    Compression {
        /// Error message describing the compression issue
        message: String,
    },

    /// A required codec lookup found nothing
    #[error("Compression codec not available: {name}")]
    CodecNotAvailable {
        /// Name or tag that was requested
        name: String,
    },

    /// The codec rejected its input as malformed or truncated
    #[error("{algorithm} decompression failed: {message}")]
    DecompressionFailed {
        /// Codec that rejected the input
        algorithm: CompressionAlgorithm,
        /// Error message from the codec
        message: String,
    },

    /// A content-encoding chain contained a stage that cannot be undone
    #[error("Decompression pipeline aborted at encoding '{encoding}'")]
    PipelineAborted {
        /// The unresolvable encoding name
        encoding: String,
    },

    /// Operation cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Configuration errors
    Config,
    /// Compression errors
    Compression,
    /// Missing codec
    CodecNotAvailable,
    /// Malformed payload
    DecompressionFailed,
    /// Unresolvable encoding chain
    PipelineAborted,
    /// Cancellation
    Cancelled,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Config { .. } => ErrorKind::Config,
            Self::Compression { .. } => ErrorKind::Compression,
            Self::CodecNotAvailable { .. } => ErrorKind::CodecNotAvailable,
            Self::DecompressionFailed { .. } => ErrorKind::DecompressionFailed,
            Self::PipelineAborted { .. } => ErrorKind::PipelineAborted,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Medium,
            Self::Config { .. } => ErrorSeverity::High,
            Self::Compression { .. } => ErrorSeverity::Medium,
            Self::CodecNotAvailable { .. } => ErrorSeverity::High,
            Self::DecompressionFailed { .. } => ErrorSeverity::Medium,
            Self::PipelineAborted { .. } => ErrorSeverity::Low,
            Self::Cancelled => ErrorSeverity::Low,
            Self::Other { .. } => ErrorSeverity::Medium,
        }
    }

    /// Check if this error is recoverable
    ///
    /// An aborted pipeline leaves the content untouched, so the caller can
    /// carry on with the still-encoded body.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { io_kind, .. } => matches!(
                io_kind,
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            Self::PipelineAborted { .. } => true,
            Self::Config { .. }
            | Self::CodecNotAvailable { .. }
            | Self::DecompressionFailed { .. }
            | Self::Compression { .. }
            | Self::Cancelled => false,
            Self::Other { .. } => true,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new compression error
    pub fn compression<S: Into<String>>(message: S) -> Self {
        Self::Compression {
            message: message.into(),
        }
    }

    /// Create a new codec-not-available error
    pub fn codec_not_available<S: Into<String>>(name: S) -> Self {
        Self::CodecNotAvailable { name: name.into() }
    }

    /// Create a new decompression failure
    pub fn decompression_failed<S: Into<String>>(
        algorithm: CompressionAlgorithm,
        message: S,
    ) -> Self {
        Self::DecompressionFailed {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a new pipeline abort
    pub fn pipeline_aborted<S: Into<String>>(encoding: S) -> Self {
        Self::PipelineAborted {
            encoding: encoding.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            io_kind: error.kind(),
            message: error.to_string(),
        }
    }
}
