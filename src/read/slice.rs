//! In-memory origins.

use std::marker::PhantomData;

use super::UnitRead;
use crate::error::{PipeError, Result};
use crate::segment::Unit;

/// An origin over any in-memory storage of units (`Vec<T>`, `&[T]`,
/// `bytes::Bytes`, ...). Supports mark/reset.
///
/// # Example
///
/// ```
/// use segpipe::{SliceReader, UnitRead};
///
/// let mut origin = SliceReader::new(&b"abc"[..]);
/// origin.mark()?;
/// assert_eq!(origin.read_one()?, Some(b'a'));
/// origin.reset()?;
/// assert_eq!(origin.read_one()?, Some(b'a'));
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SliceReader<T, B> {
    data: B,
    pos: usize,
    mark: Option<usize>,
    closed: bool,
    _unit: PhantomData<T>,
}

impl<T: Unit, B: AsRef<[T]>> SliceReader<T, B> {
    /// Creates an origin positioned at the first unit of `data`.
    pub fn new(data: B) -> Self {
        Self {
            data,
            pos: 0,
            mark: None,
            closed: false,
            _unit: PhantomData,
        }
    }

    /// Returns the number of units not yet read.
    pub fn remaining(&self) -> usize {
        self.data.as_ref().len() - self.pos
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        Ok(())
    }
}

/// Creates a character origin over `s`.
///
/// # Example
///
/// ```
/// use segpipe::{UnitRead, chars};
///
/// let mut origin = chars("hé");
/// assert_eq!(origin.read_one()?, Some('h'));
/// assert_eq!(origin.read_one()?, Some('é'));
/// assert_eq!(origin.read_one()?, None);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub fn chars(s: &str) -> SliceReader<char, Vec<char>> {
    SliceReader::new(s.chars().collect())
}

impl<T: Unit, B: AsRef<[T]>> UnitRead for SliceReader<T, B> {
    type Unit = T;

    fn read_one(&mut self) -> Result<Option<T>> {
        self.check_open()?;
        let unit = self.data.as_ref().get(self.pos).copied();
        if unit.is_some() {
            self.pos += 1;
        }
        Ok(unit)
    }

    fn read_into(&mut self, buf: &mut [T]) -> Result<usize> {
        self.check_open()?;
        let rest = &self.data.as_ref()[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        self.check_open()?;
        let n = usize::try_from(n).unwrap_or(usize::MAX).min(self.remaining());
        self.pos += n;
        Ok(n as u64)
    }

    fn mark(&mut self) -> Result<()> {
        self.check_open()?;
        self.mark = Some(self.pos);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.check_open()?;
        self.pos = self.mark.ok_or(PipeError::MarkNotSet)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_read() {
        let mut origin = SliceReader::new(vec![1u8, 2, 3, 4, 5]);
        let mut buf = [0u8; 2];
        assert_eq!(origin.read_into(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(origin.remaining(), 3);
        assert_eq!(origin.skip(2).unwrap(), 2);
        assert_eq!(origin.read_into(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(origin.read_into(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_reset_without_mark() {
        let mut origin = chars("x");
        assert!(matches!(origin.reset(), Err(PipeError::MarkNotSet)));
    }

    #[test]
    fn test_new_mark_replaces_old() {
        let mut origin = chars("abcd");
        origin.mark().unwrap();
        origin.skip(2).unwrap();
        origin.mark().unwrap();
        origin.skip(1).unwrap();
        origin.reset().unwrap();
        assert_eq!(origin.read_one().unwrap(), Some('c'));
    }

    #[test]
    fn test_closed() {
        let mut origin = chars("abc");
        origin.close().unwrap();
        origin.close().unwrap();
        assert!(matches!(origin.read_one(), Err(PipeError::Closed)));
        assert!(matches!(origin.mark(), Err(PipeError::Closed)));
    }

    #[test]
    fn test_bytes_storage() {
        let mut origin = SliceReader::new(bytes::Bytes::from_static(b"hi"));
        assert_eq!(origin.read_one().unwrap(), Some(b'h'));
        assert_eq!(origin.remaining(), 1);
    }
}
