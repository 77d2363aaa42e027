//! Readable origins.
//!
//! A [`UnitRead`] is anything that hands out bytes or characters on demand:
//! an in-memory slice, a `std::io::Read`, a seekable file, or a codec reader
//! sitting on top of another origin. Chunk sources, codec readers and pull
//! streams all speak this one trait.
//!
//! - [`IoReader`] - Any [`std::io::Read`] as a byte origin
//! - [`SeekReader`] - A [`Read`](std::io::Read) + [`Seek`](std::io::Seek) origin with mark/reset
//! - [`SliceReader`] - In-memory units with mark/reset
//! - [`chars`] - Character origin over a string

mod io;
mod slice;

pub use io::{IoReader, SeekReader};
pub use slice::{SliceReader, chars};

use crate::error::{PipeError, Result};
use crate::segment::Unit;

/// A pull-based origin of units.
///
/// Implementors provide [`read_one`](UnitRead::read_one); the bulk
/// [`read_into`](UnitRead::read_into) and [`skip`](UnitRead::skip) paths are
/// built on it and should be overridden when a faster primitive exists.
///
/// Reads block until at least one unit is available or the origin is
/// exhausted. End of origin is `None` from `read_one` and `0` from
/// `read_into` with a non-empty buffer.
pub trait UnitRead {
    /// Element type produced by this origin.
    type Unit: Unit;

    /// Reads a single unit, `None` at end of origin.
    fn read_one(&mut self) -> Result<Option<Self::Unit>>;

    /// Reads up to `buf.len()` units, returning how many were written.
    fn read_into(&mut self, buf: &mut [Self::Unit]) -> Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.read_one()? {
                Some(unit) => {
                    buf[n] = unit;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    /// Discards up to `n` units, returning how many were skipped.
    fn skip(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n {
            if self.read_one()?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Remembers the current position for a later [`reset`](UnitRead::reset).
    fn mark(&mut self) -> Result<()> {
        Err(PipeError::MarkUnsupported)
    }

    /// Rewinds to the last [`mark`](UnitRead::mark).
    fn reset(&mut self) -> Result<()> {
        Err(PipeError::MarkUnsupported)
    }

    /// Releases the underlying handle. Calling it again is a no-op.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<R: UnitRead + ?Sized> UnitRead for &mut R {
    type Unit = R::Unit;

    fn read_one(&mut self) -> Result<Option<Self::Unit>> {
        (**self).read_one()
    }

    fn read_into(&mut self, buf: &mut [Self::Unit]) -> Result<usize> {
        (**self).read_into(buf)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        (**self).skip(n)
    }

    fn mark(&mut self) -> Result<()> {
        (**self).mark()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<R: UnitRead + ?Sized> UnitRead for Box<R> {
    type Unit = R::Unit;

    fn read_one(&mut self) -> Result<Option<Self::Unit>> {
        (**self).read_one()
    }

    fn read_into(&mut self, buf: &mut [Self::Unit]) -> Result<usize> {
        (**self).read_into(buf)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        (**self).skip(n)
    }

    fn mark(&mut self) -> Result<()> {
        (**self).mark()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
