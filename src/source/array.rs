//! Zero-copy source over in-memory storage.

use std::marker::PhantomData;

use super::ChunkSource;
use crate::error::{PipeError, Result};
use crate::segment::{Segment, Unit};

/// A source whose segments are slices of the backing storage.
///
/// # Example
///
/// ```
/// use segpipe::{ArraySource, ChunkSource};
///
/// let mut src = ArraySource::with_range(vec![1u8, 2, 3, 4, 5], 1, 3)?;
/// assert_eq!(src.read(2)?.data, &[2, 3]);
/// assert_eq!(src.read(2)?.data, &[4]);
/// assert!(src.read(2)?.end);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArraySource<T, B> {
    data: B,
    pos: usize,
    end: usize,
    closed: bool,
    _unit: PhantomData<T>,
}

impl<T: Unit, B: AsRef<[T]>> ArraySource<T, B> {
    /// Creates a source over all of `data`.
    pub fn new(data: B) -> Self {
        let end = data.as_ref().len();
        Self {
            data,
            pos: 0,
            end,
            closed: false,
            _unit: PhantomData,
        }
    }

    /// Creates a source over `len` units of `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] if the window does not fit in `data`.
    pub fn with_range(data: B, offset: usize, len: usize) -> Result<Self> {
        let total = data.as_ref().len();
        let end = offset.checked_add(len).filter(|&end| end <= total).ok_or(
            PipeError::InvalidConfig {
                message: "offset/length out of bounds",
            },
        )?;
        Ok(Self {
            data,
            pos: offset,
            end,
            closed: false,
            _unit: PhantomData,
        })
    }

    /// Returns the number of units not yet read.
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }
}

impl<T: Unit, B: AsRef<[T]>> ChunkSource for ArraySource<T, B> {
    type Unit = T;

    fn read(&mut self, max_units: usize) -> Result<Segment<'_, T>> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        if self.pos == self.end {
            return Ok(Segment::end());
        }

        let n = max_units.min(self.end - self.pos);
        let start = self.pos;
        self.pos += n;
        Ok(Segment::more(&self.data.as_ref()[start..start + n]))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
