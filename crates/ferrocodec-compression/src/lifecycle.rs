//! Stream ownership rules shared by the adapters and the pipeline
//!
//! - A stream passed **by value** is owned by the callee and is dropped
//!   before the call returns, on every exit path.
//! - A stream passed **by `&mut`** stays with the caller and is rewound to
//!   offset 0 once consumed, whether or not the operation succeeded.
//! - Produced output is always a [`Cursor`] positioned at 0.
//! - Intermediate buffers live in the call frame, so an error return drops
//!   them before the error reaches the caller.

use ferrocodec_types::{CancellationToken, Error, Result};
use std::io::{Cursor, Seek, SeekFrom};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// Wrap freshly produced bytes in a readable stream positioned at the start
pub fn materialize(bytes: Vec<u8>) -> Cursor<Vec<u8>> {
    Cursor::new(bytes)
}

/// Run `operation` against a borrowed stream and rewind the stream afterwards
///
/// The operation's error wins over a rewind error.
pub fn rewind_after<R, T, F>(input: &mut R, operation: F) -> Result<T>
where
    R: Seek + ?Sized,
    F: FnOnce(&mut R) -> Result<T>,
{
    let result = operation(input);
    let rewound = input.seek(SeekFrom::Start(0));
    let value = result?;
    rewound?;
    Ok(value)
}

/// Async counterpart of [`rewind_after`] for the rewind step
pub async fn rewind_async<R>(input: &mut R) -> Result<()>
where
    R: AsyncSeek + Unpin + ?Sized,
{
    input.seek(SeekFrom::Start(0)).await?;
    Ok(())
}

/// Read `input` to exhaustion in `chunk_size` chunks
///
/// The token is checked before every chunk and raced against every read, so
/// cancellation is observed at each I/O boundary. On cancellation the partial
/// buffer is dropped before [`Error::Cancelled`] is returned.
pub async fn read_to_end_cancellable<R>(
    input: &mut R,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let read = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            read = input.read(&mut chunk) => read?,
        };

        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_starts_at_zero() {
        let stream = materialize(vec![1, 2, 3]);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.get_ref().len(), 3);
    }

    #[test]
    fn test_rewind_after_success() {
        let mut input = Cursor::new(b"abcdef".to_vec());
        let read = rewind_after(&mut input, |input| {
            let mut out = Vec::new();
            std::io::Read::read_to_end(input, &mut out)?;
            Ok(out)
        })
        .unwrap();

        assert_eq!(read, b"abcdef");
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_rewind_after_failure_still_rewinds() {
        let mut input = Cursor::new(b"abcdef".to_vec());
        let result: Result<()> = rewind_after(&mut input, |input| {
            input.set_position(4);
            Err(Error::other("boom"))
        });

        assert!(result.is_err());
        assert_eq!(input.position(), 0);
    }

    #[tokio::test]
    async fn test_read_to_end_cancellable_reads_everything() {
        let data = vec![7u8; 10_000];
        let mut input = Cursor::new(data.clone());

        let read = read_to_end_cancellable(&mut input, 64, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(read, data);
    }

    #[tokio::test]
    async fn test_read_to_end_cancellable_observes_token() {
        let token = CancellationToken::new();
        token.cancel();
        let mut input = Cursor::new(vec![1u8; 16]);

        let result = read_to_end_cancellable(&mut input, 4, &token).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_rewind_async() {
        let mut input = Cursor::new(vec![1u8; 16]);
        input.set_position(10);
        rewind_async(&mut input).await.unwrap();
        assert_eq!(input.position(), 0);
    }
}
