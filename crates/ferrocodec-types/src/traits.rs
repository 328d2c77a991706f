//! HTTP body abstraction consumed by the decompression entry points
//!
//! The surrounding HTTP layer only has to hand over something that can be
//! turned into a byte stream once; everything after that is plain stream I/O.

use crate::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

/// Readable body stream produced by [`HttpBody::read_as_stream`]
pub type BodyStream = Box<dyn AsyncRead + Send + Unpin>;

/// A response body that can be read exactly once
#[async_trait]
pub trait HttpBody: Send {
    /// Turn the body into a stream; consumes the body
    async fn read_as_stream(self: Box<Self>, cancel: &CancellationToken) -> Result<BodyStream>;
}

#[async_trait]
impl HttpBody for Vec<u8> {
    async fn read_as_stream(self: Box<Self>, cancel: &CancellationToken) -> Result<BodyStream> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(Box::new(std::io::Cursor::new(*self)))
    }
}

/// Body backed by an arbitrary async reader
pub struct ReaderBody<R> {
    reader: R,
}

impl<R> ReaderBody<R>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> fmt::Debug for ReaderBody<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderBody").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R> HttpBody for ReaderBody<R>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    async fn read_as_stream(self: Box<Self>, cancel: &CancellationToken) -> Result<BodyStream> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(Box::new(self.reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_buffered_body_reads_back() {
        let body: Box<dyn HttpBody> = Box::new(b"payload".to_vec());
        let mut stream = body
            .read_as_stream(&CancellationToken::new())
            .await
            .unwrap();

        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"payload");
    }

    #[test]
    fn test_reader_body_streams_chunks() {
        let reader = tokio_test::io::Builder::new()
            .read(b"pay")
            .read(b"load")
            .build();
        let body: Box<dyn HttpBody> = Box::new(ReaderBody::new(reader));

        let out = tokio_test::block_on(async {
            let mut stream = body.read_as_stream(&CancellationToken::new()).await?;
            let mut out = Vec::new();
            stream.read_to_end(&mut out).await?;
            Ok::<_, Error>(out)
        })
        .unwrap();
        assert_eq!(out, b"payload");
    }

    #[tokio::test]
    async fn test_reader_body_honours_cancellation() {
        let token = CancellationToken::new();
        token.cancel();

        let body: Box<dyn HttpBody> = Box::new(ReaderBody::new(std::io::Cursor::new(vec![1u8])));
        let result = body.read_as_stream(&token).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
