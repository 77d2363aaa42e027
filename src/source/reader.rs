//! Buffered source over a [`UnitRead`] origin.

use super::ChunkSource;
use crate::error::{PipeError, Result};
use crate::read::UnitRead;
use crate::segment::Segment;

/// A source that reads from an origin into one reusable buffer.
///
/// Each segment borrows that buffer, so it is only valid until the next
/// read. The buffer grows to the largest `max_units` requested.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use segpipe::{ChunkSource, source};
///
/// let mut src = source::from_reader(Cursor::new(b"hello".to_vec()));
/// assert_eq!(src.read(3)?.data, b"hel");
/// assert_eq!(src.read(3)?.data, b"lo");
/// assert!(src.read(3)?.end);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug)]
pub struct ReaderSource<R: UnitRead> {
    origin: R,
    buffer: Vec<R::Unit>,
    ended: bool,
    closed: bool,
}

impl<R: UnitRead> ReaderSource<R> {
    /// Creates a source over `origin`.
    pub fn new(origin: R) -> Self {
        Self {
            origin,
            buffer: Vec::new(),
            ended: false,
            closed: false,
        }
    }

    /// Returns a reference to the origin.
    pub fn get_ref(&self) -> &R {
        &self.origin
    }

    /// Returns the origin.
    pub fn into_inner(self) -> R {
        self.origin
    }
}

impl<R: UnitRead> ChunkSource for ReaderSource<R> {
    type Unit = R::Unit;

    fn read(&mut self, max_units: usize) -> Result<Segment<'_, R::Unit>> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        if self.ended {
            return Ok(Segment::end());
        }
        if max_units == 0 {
            return Ok(Segment::more(&[]));
        }

        if self.buffer.len() < max_units {
            self.buffer.resize(max_units, Default::default());
        }
        let n = self.origin.read_into(&mut self.buffer[..max_units])?;
        if n == 0 {
            tracing::trace!(unit = <R::Unit as crate::Unit>::NAME, "origin exhausted");
            self.ended = true;
            return Ok(Segment::end());
        }
        Ok(Segment::more(&self.buffer[..n]))
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.origin.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::{SliceReader, chars};
    use crate::source;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_char_source() {
        let mut src = source::from_str("añb");
        assert_eq!(src.read(2).unwrap().data, &['a', 'ñ']);
        assert_eq!(src.read(2).unwrap().data, &['b']);
        assert!(src.read(2).unwrap().end);
    }

    #[test]
    fn test_end_delivered_once_from_origin() {
        struct CountingEof {
            eofs: usize,
        }
        impl Read for CountingEof {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                self.eofs += 1;
                Ok(0)
            }
        }

        let mut src = source::from_reader(CountingEof { eofs: 0 });
        assert!(src.read(4).unwrap().end);
        assert!(src.read(4).unwrap().end);
        assert!(src.read(0).unwrap().end);
        assert_eq!(src.into_inner().into_inner().unwrap().eofs, 1);
    }

    #[test]
    fn test_zero_read_does_not_touch_origin() {
        let mut src = ReaderSource::new(SliceReader::new(vec![7u8]));
        let seg = src.read(0).unwrap();
        assert!(seg.is_empty() && !seg.end);
        assert_eq!(src.get_ref().remaining(), 1);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut src = ReaderSource::new(chars("abc"));
        src.close().unwrap();
        src.close().unwrap();
        assert!(matches!(src.read(1), Err(PipeError::Closed)));
    }

    #[test]
    fn test_seekable_offset() {
        let mut src = source::from_seekable(Cursor::new(b"0123456789".to_vec()), 7).unwrap();
        assert_eq!(src.read(8).unwrap().data, b"789");
        assert!(src.read(8).unwrap().end);
        assert!(source::from_seekable(Cursor::new(vec![0u8; 2]), 3).is_err());
    }
}
