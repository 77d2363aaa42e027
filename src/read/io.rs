//! Byte origins backed by `std::io`.

use std::io::{self, Read, Seek, SeekFrom};

use super::UnitRead;
use crate::error::{PipeError, Result};

/// Reads from `reader`, retrying on `Interrupted`.
fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// A byte origin over any [`std::io::Read`].
///
/// The reader is dropped on [`close`](UnitRead::close); any read afterwards
/// fails with [`PipeError::Closed`].
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use segpipe::{IoReader, UnitRead};
///
/// let mut origin = IoReader::new(Cursor::new(b"ab".to_vec()));
/// assert_eq!(origin.read_one()?, Some(b'a'));
/// assert_eq!(origin.read_one()?, Some(b'b'));
/// assert_eq!(origin.read_one()?, None);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug)]
pub struct IoReader<R> {
    inner: Option<R>,
}

impl<R: Read> IoReader<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self {
            inner: Some(reader),
        }
    }

    /// Returns the reader, or `None` once closed.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }

    fn reader(&mut self) -> Result<&mut R> {
        self.inner.as_mut().ok_or(PipeError::Closed)
    }
}

impl<R: Read> UnitRead for IoReader<R> {
    type Unit = u8;

    fn read_one(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match read_retrying(self.reader()?, &mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_retrying(self.reader()?, buf)
    }

    fn close(&mut self) -> Result<()> {
        self.inner = None;
        Ok(())
    }
}

/// A random-access byte origin that supports mark/reset by seeking.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use segpipe::{SeekReader, UnitRead};
///
/// let mut origin = SeekReader::at_offset(Cursor::new(b"hello".to_vec()), 3)?;
/// origin.mark()?;
/// assert_eq!(origin.read_one()?, Some(b'l'));
/// origin.reset()?;
/// assert_eq!(origin.read_one()?, Some(b'l'));
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug)]
pub struct SeekReader<R> {
    inner: Option<R>,
    mark: Option<u64>,
}

impl<R: Read + Seek> SeekReader<R> {
    /// Wraps a reader at its current position.
    pub fn new(reader: R) -> Self {
        Self {
            inner: Some(reader),
            mark: None,
        }
    }

    /// Wraps a reader and seeks it to `offset` from the start.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] if `offset` lies past the end of
    /// the reader, or [`PipeError::Io`] if seeking fails.
    pub fn at_offset(mut reader: R, offset: u64) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        if offset > len {
            return Err(PipeError::InvalidConfig {
                message: "offset is past the end of the origin",
            });
        }
        reader.seek(SeekFrom::Start(offset))?;
        Ok(Self::new(reader))
    }

    /// Returns the reader, or `None` once closed.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }

    fn reader(&mut self) -> Result<&mut R> {
        self.inner.as_mut().ok_or(PipeError::Closed)
    }
}

impl<R: Read + Seek> UnitRead for SeekReader<R> {
    type Unit = u8;

    fn read_one(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match read_retrying(self.reader()?, &mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_retrying(self.reader()?, buf)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let reader = self.reader()?;
        let pos = reader.stream_position()?;
        let len = reader.seek(SeekFrom::End(0))?;
        let target = pos.saturating_add(n).min(len.max(pos));
        reader.seek(SeekFrom::Start(target))?;
        Ok(target - pos)
    }

    fn mark(&mut self) -> Result<()> {
        let pos = self.reader()?.stream_position()?;
        self.mark = Some(pos);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        let pos = self.mark.ok_or(PipeError::MarkNotSet)?;
        self.reader()?.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.inner = None;
        self.mark = None;
        Ok(())
    }
}
