//! Multi-stage `Content-Encoding` decompression
//!
//! A sender applies encodings in the order they are listed, so they are
//! undone last-to-first. Every stage is resolved before the first byte is
//! decoded: an unknown name or the `none` sentinel aborts the whole chain and
//! the caller keeps the original bytes. Intermediate streams are always owned
//! by the pipeline; only the caller's input follows the caller's ownership
//! choice.

use crate::adapter::CodecAdapter;
use crate::lifecycle::{materialize, read_to_end_cancellable, rewind_after, rewind_async};
use crate::registry::CodecRegistry;
use ferrocodec_types::{BufferSize, CancellationToken, Error, HttpBody, Result};
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncSeek};
use tracing::{debug, warn};

/// Split a `Content-Encoding` header value into its encoding tokens
///
/// ```rust
/// use ferrocodec_compression::parse_content_encoding;
///
/// assert_eq!(parse_content_encoding("gzip, br"), vec!["gzip", "br"]);
/// assert!(parse_content_encoding(" , ").is_empty());
/// ```
pub fn parse_content_encoding(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Undoes a chain of content encodings using a shared registry
#[derive(Debug, Clone)]
pub struct DecompressionPipeline {
    registry: Arc<CodecRegistry>,
}

impl DecompressionPipeline {
    /// Create a pipeline over a registry
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    /// Registry used for stage lookup
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Resolve the decoding stages for `encodings`, outermost first
    ///
    /// Fails with [`Error::PipelineAborted`] when any name is unknown or
    /// names the `none` sentinel.
    pub fn plan<S: AsRef<str>>(&self, encodings: &[S]) -> Result<Vec<CodecAdapter>> {
        encodings
            .iter()
            .rev()
            .map(|encoding| {
                let encoding = encoding.as_ref();
                match self.registry.resolve_by_name(encoding) {
                    Some(adapter) if !adapter.algorithm().is_none() => Ok(adapter.clone()),
                    _ => {
                        warn!("No applicable decompression for encoding '{}'", encoding);
                        Err(Error::pipeline_aborted(encoding.trim()))
                    }
                }
            })
            .collect()
    }

    /// Decode an owned stream; the input is released before returning
    pub fn apply<S, R>(&self, encodings: &[S], input: R) -> Result<Cursor<Vec<u8>>>
    where
        S: AsRef<str>,
        R: Read,
    {
        let stages = self.plan(encodings)?;
        run_stages(&stages, Box::new(input))
    }

    /// Decode a stream that stays with the caller; it is rewound afterwards
    pub fn apply_leave_open<S, R>(&self, encodings: &[S], input: &mut R) -> Result<Cursor<Vec<u8>>>
    where
        S: AsRef<str>,
        R: Read + Seek,
    {
        let stages = self.plan(encodings)?;
        rewind_after(input, |input: &mut R| run_stages(&stages, Box::new(&mut *input)))
    }

    /// Decode an owned async stream
    ///
    /// The input is drained with cancellation checks between chunks, then
    /// every stage runs on the blocking pool.
    pub async fn apply_async<S, R>(
        &self,
        encodings: &[S],
        mut input: R,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        S: AsRef<str>,
        R: AsyncRead + Unpin,
    {
        let stages = self.plan(encodings)?;
        let chunk_size = self.registry.options().buffer_size.get();

        let data = read_to_end_cancellable(&mut input, chunk_size, cancel).await;
        drop(input);
        let data = data?;

        decode_blocking(stages, data, cancel).await
    }

    /// Decode an async stream that stays with the caller
    ///
    /// The stream is rewound to the start after success, after a failed
    /// stage and after cancellation.
    pub async fn apply_async_leave_open<S, R>(
        &self,
        encodings: &[S],
        input: &mut R,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        S: AsRef<str>,
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let stages = self.plan(encodings)?;
        let chunk_size = self.registry.options().buffer_size.get();

        let data = read_to_end_cancellable(input, chunk_size, cancel).await;
        let rewound = rewind_async(input).await;
        let data = data?;
        rewound?;

        decode_blocking(stages, data, cancel).await
    }

    /// Decode an HTTP message in place
    ///
    /// Never loses the original bytes: when the chain cannot be applied or a
    /// stage fails, the content comes back exactly as it arrived.
    pub fn decode_content(&self, content: HttpContent) -> ContentDecoding {
        if !content.is_encoded() {
            debug!("Content carries no encoding, leaving body unchanged");
            return ContentDecoding::Unchanged(content);
        }

        let result = self.apply(&content.content_encoding, &content.body[..]);
        finish(content, result)
    }

    /// Async form of [`decode_content`](Self::decode_content)
    pub async fn decode_content_async(
        &self,
        content: HttpContent,
        cancel: &CancellationToken,
    ) -> ContentDecoding {
        if !content.is_encoded() {
            debug!("Content carries no encoding, leaving body unchanged");
            return ContentDecoding::Unchanged(content);
        }

        let result = self
            .apply_async(&content.content_encoding, &content.body[..], cancel)
            .await;
        finish(content, result)
    }
}

fn finish(mut content: HttpContent, result: Result<Cursor<Vec<u8>>>) -> ContentDecoding {
    match result {
        Ok(decoded) => {
            let body = decoded.into_inner();
            debug!(
                "Decoded {} encoded bytes to {} bytes through [{}]",
                content.body.len(),
                body.len(),
                content.content_encoding.join(", ")
            );
            content.content_length = Some(body.len() as u64);
            content.content_encoding.clear();
            content.body = body;
            ContentDecoding::Decoded(content)
        }
        Err(Error::PipelineAborted { .. }) => ContentDecoding::Unchanged(content),
        Err(error) => {
            warn!(
                "Decoding [{}] failed, keeping original body: {}",
                content.content_encoding.join(", "),
                error
            );
            ContentDecoding::Failed { content, error }
        }
    }
}

async fn decode_blocking(
    stages: Vec<CodecAdapter>,
    data: Vec<u8>,
    cancel: &CancellationToken,
) -> Result<Cursor<Vec<u8>>> {
    let output = tokio::task::spawn_blocking(move || run_stages(&stages, Box::new(&data[..])))
        .await
        .map_err(|join_err| Error::other(format!("Task join error: {}", join_err)))??;

    if cancel.is_cancelled() {
        drop(output);
        return Err(Error::Cancelled);
    }
    Ok(output)
}

fn run_stages(stages: &[CodecAdapter], mut input: Box<dyn Read + '_>) -> Result<Cursor<Vec<u8>>> {
    let Some((first, rest)) = stages.split_first() else {
        let mut passthrough = Vec::new();
        input.read_to_end(&mut passthrough)?;
        return Ok(materialize(passthrough));
    };

    debug!("Decoding stage {}", first.encoding_name());
    let mut current = materialize(first.decompress_reader(input)?);
    for stage in rest {
        debug!("Decoding stage {}", stage.encoding_name());
        current = stage.decompress_to_stream(current, stage.options().buffer_size)?;
    }
    Ok(current)
}

/// Minimal view of an HTTP message: encoding headers plus a buffered body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpContent {
    /// `Content-Encoding` tokens in the order they were applied
    pub content_encoding: Vec<String>,
    /// `Content-Length`, when known
    pub content_length: Option<u64>,
    /// Body bytes
    pub body: Vec<u8>,
}

impl HttpContent {
    /// Content with a known length and no encodings
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            content_encoding: Vec::new(),
            content_length: Some(body.len() as u64),
            body,
        }
    }

    /// Set the encoding tokens
    pub fn with_content_encoding<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_encoding = encodings.into_iter().map(Into::into).collect();
        self
    }

    /// Set the encoding tokens from a raw header value
    pub fn with_content_encoding_header(mut self, value: &str) -> Self {
        self.content_encoding = parse_content_encoding(value);
        self
    }

    /// Buffer an HTTP body in `buffer_size` chunks; the body is read exactly once
    pub async fn from_body(
        body: Box<dyn HttpBody>,
        content_encoding: Vec<String>,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let mut stream = body.read_as_stream(cancel).await?;
        let bytes = read_to_end_cancellable(&mut stream, buffer_size.get(), cancel).await?;
        Ok(Self::new(bytes).with_content_encoding(content_encoding))
    }

    /// Whether any encoding is declared
    pub fn is_encoded(&self) -> bool {
        !self.content_encoding.is_empty()
    }
}

/// Outcome of [`DecompressionPipeline::decode_content`]
#[derive(Debug)]
pub enum ContentDecoding {
    /// Body decoded; encoding headers cleared and length updated
    Decoded(HttpContent),
    /// Nothing applicable; content returned as it arrived
    Unchanged(HttpContent),
    /// A stage failed; content returned as it arrived
    Failed {
        /// Original content
        content: HttpContent,
        /// Stage failure
        error: Error,
    },
}

impl ContentDecoding {
    /// Take the content regardless of outcome
    pub fn into_content(self) -> HttpContent {
        match self {
            Self::Decoded(content) | Self::Unchanged(content) | Self::Failed { content, .. } => {
                content
            }
        }
    }

    /// Whether the body was decoded
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    /// Failure, if a stage failed
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
