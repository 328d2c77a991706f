//! Asynchronous call shapes for [`CodecAdapter`]
//!
//! Input is drained chunk by chunk with the cancellation token checked at
//! every read. The codec itself then runs on the blocking pool so the async
//! executor never performs CPU-bound work.

use crate::adapter::CodecAdapter;
use crate::lifecycle::{materialize, read_to_end_cancellable, rewind_async};
use ferrocodec_types::{BufferSize, CancellationToken, CompressionLevel, Error, HttpBody, Result};
use std::io::Cursor;
use tokio::io::{AsyncRead, AsyncSeek};
use tracing::debug;

impl CodecAdapter {
    /// Compress an async stream, consuming and releasing it
    pub async fn compress_async<R>(
        &self,
        mut input: R,
        level: CompressionLevel,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let chunk_size = self.options().buffer_size.get();
        let data = read_to_end_cancellable(&mut input, chunk_size, cancel).await;
        drop(input);
        let data = data?;

        self.run_blocking(cancel, move |adapter| adapter.compress(&data, level))
            .await
    }

    /// Compress an async stream that stays with the caller; it is rewound afterwards
    pub async fn compress_async_leave_open<R>(
        &self,
        input: &mut R,
        level: CompressionLevel,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let chunk_size = self.options().buffer_size.get();
        let data = read_to_end_cancellable(input, chunk_size, cancel).await;
        let rewound = rewind_async(input).await;
        let data = data?;
        rewound?;

        self.run_blocking(cancel, move |adapter| adapter.compress(&data, level))
            .await
    }

    /// Compress an async stream into a readable stream positioned at 0
    pub async fn compress_to_stream_async<R>(
        &self,
        input: R,
        level: CompressionLevel,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        R: AsyncRead + Unpin,
    {
        self.compress_async(input, level, cancel)
            .await
            .map(materialize)
    }

    /// Like [`compress_to_stream_async`](Self::compress_to_stream_async), leaving the input open
    pub async fn compress_to_stream_async_leave_open<R>(
        &self,
        input: &mut R,
        level: CompressionLevel,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        self.compress_async_leave_open(input, level, cancel)
            .await
            .map(materialize)
    }

    /// Decompress an async stream, consuming and releasing it
    pub async fn decompress_async<R>(&self, input: R, cancel: &CancellationToken) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let buffer_size = self.options().buffer_size;
        self.decompress_owned_async(input, buffer_size, cancel).await
    }

    /// Decompress an async stream that stays with the caller; it is rewound afterwards
    pub async fn decompress_async_leave_open<R>(
        &self,
        input: &mut R,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let buffer_size = self.options().buffer_size;
        self.decompress_borrowed_async(input, buffer_size, cancel)
            .await
    }

    /// Decompress an async stream into a readable stream positioned at 0
    pub async fn decompress_to_stream_async<R>(
        &self,
        input: R,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        R: AsyncRead + Unpin,
    {
        self.decompress_owned_async(input, buffer_size, cancel)
            .await
            .map(materialize)
    }

    /// Like [`decompress_to_stream_async`](Self::decompress_to_stream_async), leaving the input open
    pub async fn decompress_to_stream_async_leave_open<R>(
        &self,
        input: &mut R,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        self.decompress_borrowed_async(input, buffer_size, cancel)
            .await
            .map(materialize)
    }

    /// Decompress an HTTP body
    ///
    /// The body is turned into a stream exactly once and then handled like
    /// any owned stream.
    pub async fn decompress_body(
        &self,
        body: Box<dyn HttpBody>,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Cursor<Vec<u8>>> {
        let stream = body.read_as_stream(cancel).await?;
        self.decompress_to_stream_async(stream, buffer_size, cancel)
            .await
    }

    async fn decompress_owned_async<R>(
        &self,
        mut input: R,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let data = read_to_end_cancellable(&mut input, buffer_size.get(), cancel).await;
        drop(input);
        let data = data?;

        self.run_blocking(cancel, move |adapter| {
            adapter.decompress_with_buffer(&data, buffer_size)
        })
        .await
    }

    async fn decompress_borrowed_async<R>(
        &self,
        input: &mut R,
        buffer_size: BufferSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let data = read_to_end_cancellable(input, buffer_size.get(), cancel).await;
        let rewound = rewind_async(input).await;
        let data = data?;
        rewound?;

        self.run_blocking(cancel, move |adapter| {
            adapter.decompress_with_buffer(&data, buffer_size)
        })
        .await
    }

    async fn run_blocking<T, F>(&self, cancel: &CancellationToken, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&CodecAdapter) -> Result<T> + Send + 'static,
    {
        let adapter = self.clone();
        let output = tokio::task::spawn_blocking(move || work(&adapter))
            .await
            .map_err(|join_err| Error::other(format!("Task join error: {}", join_err)))??;

        if cancel.is_cancelled() {
            debug!("Discarding {} output after cancellation", self.algorithm());
            drop(output);
            return Err(Error::Cancelled);
        }
        Ok(output)
    }
}
