//! Streaming copy of entry content to disk.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::ExtractionError;
use crate::Result;

/// Buffer size for entry copies (64KB), matching typical filesystem block
/// sizes.
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable buffer for copying entry content.
///
/// One buffer is allocated per extraction and shared by every entry.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies an entry's full content from `reader` to `writer`.
///
/// Returns the number of bytes copied. There is no partial-write recovery:
/// on error the writer keeps whatever was written so far.
///
/// # Errors
///
/// - `ExtractionError::InvalidArchive` if reading the entry fails, which
///   covers truncated data and checksum mismatches
/// - `ExtractionError::Io` if writing fails
///
/// # Examples
///
/// ```
/// use spacestore_core::extraction::stream::{CopyBuffer, copy_entry};
///
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"hello";
/// let mut output = Vec::new();
///
/// let copied = copy_entry(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 5);
/// assert_eq!(output, b"hello");
/// ```
pub fn copy_entry<R, W>(reader: &mut R, writer: &mut W, buffer: &mut CopyBuffer) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ExtractionError::InvalidArchive(format!(
                    "failed to read entry data: {e}"
                )));
            }
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}
