//! Read limit view over another source.

use super::ChunkSource;
use crate::error::{PipeError, Result};
use crate::segment::Segment;

/// A source that yields at most `limit` units of the wrapped source.
///
/// Once the limit is reached the terminal segment is returned without
/// reading the wrapped source again.
#[derive(Debug)]
pub struct Limit<S> {
    inner: S,
    remaining: u64,
    ended: bool,
    closed: bool,
}

impl<S: ChunkSource> Limit<S> {
    /// Wraps `inner` with a limit of `n` units.
    pub fn new(inner: S, n: u64) -> Self {
        Self {
            inner,
            remaining: n,
            ended: false,
            closed: false,
        }
    }

    /// Returns the number of units still allowed through.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ChunkSource> ChunkSource for Limit<S> {
    type Unit = S::Unit;

    fn read(&mut self, max_units: usize) -> Result<Segment<'_, S::Unit>> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        if self.ended || self.remaining == 0 {
            self.ended = true;
            return Ok(Segment::end());
        }

        let n = usize::try_from(self.remaining).map_or(max_units, |r| r.min(max_units));
        let seg = self.inner.read(n)?;
        self.remaining -= seg.len() as u64;
        if seg.end {
            self.ended = true;
        }
        Ok(seg)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.close()
    }
}
