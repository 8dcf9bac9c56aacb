//! Streaming capture of a child's standard output.

use std::borrow::Cow;
use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::error::CaptureError;

/// Starting capacity of the capture buffer; most staged diffs fit without growing.
pub const INITIAL_CAPACITY: usize = 8 * 1024;

/// Minimum free space kept available before each read.
pub const READ_CHUNK: usize = 4 * 1024;

/// The full standard output of a command.
///
/// Holds exactly the bytes the command wrote. Nothing is appended or
/// stripped, so binary content and embedded NUL bytes pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    bytes: Vec<u8>,
}

impl CapturedOutput {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated capacity, always at least [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// View as text, replacing invalid UTF-8 sequences.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl From<Vec<u8>> for CapturedOutput {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&str> for CapturedOutput {
    fn from(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
        }
    }
}

/// Double `buf`'s capacity, reporting allocation failure instead of aborting.
fn grow(buf: &mut Vec<u8>) -> Result<(), CaptureError> {
    let requested = buf
        .capacity()
        .checked_mul(2)
        .ok_or(CaptureError::OutOfMemory { requested: usize::MAX })?;
    buf.try_reserve_exact(requested - buf.len())
        .map_err(|_| CaptureError::OutOfMemory { requested })
}

/// Read `reader` to end of stream.
///
/// The buffer starts at [`INITIAL_CAPACITY`] and doubles whenever less than
/// [`READ_CHUNK`] bytes remain free. A zero-length read is end of stream; a
/// read error aborts with [`CaptureError::ReadFailed`]. Interrupted reads are
/// retried.
pub async fn read_captured<R>(mut reader: R) -> Result<CapturedOutput, CaptureError>
where
    R: AsyncRead + Unpin,
{
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(INITIAL_CAPACITY)
        .map_err(|_| CaptureError::OutOfMemory {
            requested: INITIAL_CAPACITY,
        })?;

    loop {
        if buf.capacity() - buf.len() < READ_CHUNK {
            grow(&mut buf)?;
            trace!(capacity = buf.capacity(), "grew capture buffer");
        }

        match reader.read_buf(&mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CaptureError::ReadFailed(e)),
        }
    }

    Ok(CapturedOutput::from(buf))
}

#[cfg(test)]
mod tests {
    use std::io;

    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_reads_small_input() {
        let input: &[u8] = b"diff --git a/x b/x\n+hello\n";
        let output = read_captured(input).await.unwrap();
        assert_eq!(output.as_bytes(), input);
        assert_eq!(output.capacity(), INITIAL_CAPACITY);
    }

    #[tokio::test]
    async fn test_empty_input_is_empty() {
        let input: &[u8] = b"";
        let output = read_captured(input).await.unwrap();
        assert!(output.is_empty());
        assert_eq!(output.len(), 0);
    }

    #[tokio::test]
    async fn test_large_input_grows_by_doubling() {
        let input: Vec<u8> = (0..1_500_000u32).map(|i| (i % 251) as u8).collect();
        let output = read_captured(input.as_slice()).await.unwrap();

        assert_eq!(output.len(), input.len());
        assert_eq!(output.as_bytes(), input.as_slice());

        // Capacity only ever doubles from the initial size
        let ratio = output.capacity() / INITIAL_CAPACITY;
        assert_eq!(output.capacity() % INITIAL_CAPACITY, 0);
        assert!(ratio.is_power_of_two(), "capacity {} is not a doubling", output.capacity());
        assert!(output.capacity() - output.len() < output.capacity() / 2 + READ_CHUNK);
    }

    #[tokio::test]
    async fn test_embedded_nul_bytes_preserved() {
        let input: &[u8] = b"+line one\0still line one\n+\0\0\n";
        let output = read_captured(input).await.unwrap();
        assert_eq!(output.as_bytes(), input);
    }

    #[tokio::test]
    async fn test_chunked_reads_are_concatenated() {
        let reader = Builder::new()
            .read(b"diff --git ")
            .read(b"a/x b/x\n")
            .read(b"+hello\n")
            .build();
        let output = read_captured(reader).await.unwrap();
        assert_eq!(output.as_bytes(), b"diff --git a/x b/x\n+hello\n");
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let reader = Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            .build();

        let err = read_captured(reader).await.unwrap_err();
        match err {
            CaptureError::ReadFailed(source) => {
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe)
            }
            other => panic!("Expected ReadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interrupted_read_is_retried() {
        let reader = Builder::new()
            .read(b"first ")
            .read_error(io::Error::new(io::ErrorKind::Interrupted, "signal"))
            .read(b"second")
            .build();

        let output = read_captured(reader).await.unwrap();
        assert_eq!(output.to_text_lossy(), "first second");
    }

    #[test]
    fn test_grow_doubles_capacity() {
        let mut buf = Vec::with_capacity(INITIAL_CAPACITY);
        buf.extend_from_slice(&[1u8; 100]);
        grow(&mut buf).unwrap();
        assert!(buf.capacity() >= INITIAL_CAPACITY * 2);
        assert_eq!(buf.len(), 100);
    }

    #[test]
    fn test_lossy_text_replaces_invalid_utf8() {
        let output = CapturedOutput::from(b"valid\xFFtext".to_vec());
        let text = output.to_text_lossy();
        assert!(text.contains("valid"));
        assert!(text.contains('\u{FFFD}'));
    }
}
