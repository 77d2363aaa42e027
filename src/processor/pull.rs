//! PullStream - lazy, caller-driven reads of a processor's output.

use std::fmt;
use std::io;

use super::Processor;
use crate::error::{PipeError, Result};
use crate::read::UnitRead;
use crate::source::ChunkSource;

/// Reads the transformed output of a [`Processor`] on demand.
///
/// The stream holds at most one transformed chunk. When it runs dry it runs
/// one more read + transform iteration of the processor; once the terminal
/// segment has been drained every read reports end of stream.
///
/// # Example
///
/// ```
/// use segpipe::{PipeConfig, Processor, UnitRead, source};
///
/// let mut stream = Processor::new(source::from_str("abc"), PipeConfig::new(2)?)?.into_stream();
/// assert_eq!(stream.read_one()?, Some('a'));
/// assert_eq!(stream.skip(1)?, 1);
/// assert_eq!(stream.read_one()?, Some('c'));
/// assert_eq!(stream.read_one()?, None);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub struct PullStream<S: ChunkSource> {
    processor: Processor<S>,
    pending: Vec<S::Unit>,
    pos: usize,
    closed: bool,
}

impl<S: ChunkSource> PullStream<S> {
    pub(crate) fn new(processor: Processor<S>) -> Self {
        Self {
            processor,
            pending: Vec::new(),
            pos: 0,
            closed: false,
        }
    }

    /// Returns the number of source units read so far.
    pub fn consumed(&self) -> u64 {
        self.processor.consumed()
    }

    /// Returns the buffered, not yet read, output.
    pub fn buffered(&self) -> &[S::Unit] {
        &self.pending[self.pos..]
    }

    /// Returns an iterator that reads the remaining units one at a time.
    ///
    /// # Example
    ///
    /// ```
    /// use segpipe::{PipeConfig, Processor, source};
    ///
    /// let mut stream = Processor::new(source::from_str("hey"), PipeConfig::new(2)?)?.into_stream();
    /// let text = stream.units().collect::<segpipe::Result<String>>()?;
    /// assert_eq!(text, "hey");
    /// # Ok::<(), segpipe::PipeError>(())
    /// ```
    pub fn units(&mut self) -> Units<'_, S> {
        Units { stream: self }
    }

    /// Makes output available, returning false at end of stream.
    fn fill(&mut self) -> Result<bool> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        while self.pos == self.pending.len() {
            if self.processor.is_finished() {
                return Ok(false);
            }
            let step = self.processor.step()?;
            self.pending.clear();
            self.pos = 0;
            if let Some(data) = step.output.as_slice() {
                self.pending.extend_from_slice(data);
            }
        }
        Ok(true)
    }
}

impl<S: ChunkSource> UnitRead for PullStream<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<S::Unit>> {
        if !self.fill()? {
            return Ok(None);
        }
        let unit = self.pending[self.pos];
        self.pos += 1;
        Ok(Some(unit))
    }

    fn read_into(&mut self, buf: &mut [S::Unit]) -> Result<usize> {
        if buf.is_empty() {
            return if self.closed { Err(PipeError::Closed) } else { Ok(0) };
        }
        if !self.fill()? {
            return Ok(0);
        }
        let available = &self.pending[self.pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n && self.fill()? {
            let available = (self.pending.len() - self.pos) as u64;
            let step = available.min(n - skipped);
            // step <= available, which fits in usize
            self.pos += step as usize;
            skipped += step;
        }
        Ok(skipped)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pending = Vec::new();
        self.pos = 0;
        tracing::debug!(consumed = self.processor.consumed(), "pull stream closed");
        self.processor.close_source()
    }
}

impl<S: ChunkSource<Unit = u8>> io::Read for PullStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf)?)
    }
}

/// Iterator over the units of a [`PullStream`].
///
/// Created by [`PullStream::units`].
pub struct Units<'a, S: ChunkSource> {
    stream: &'a mut PullStream<S>,
}

impl<S: ChunkSource> Iterator for Units<'_, S> {
    type Item = Result<S::Unit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.read_one().transpose()
    }
}

impl<S: ChunkSource> fmt::Debug for Units<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Units").field("stream", &self.stream).finish()
    }
}

impl<S: ChunkSource> fmt::Debug for PullStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullStream")
            .field("consumed", &self.processor.consumed())
            .field("buffered", &(self.pending.len() - self.pos))
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::from_fn;
    use crate::{ArraySource, PipeConfig, Transformed, source};
    use std::io::Read;

    fn stream(data: &'static [u8], block: usize) -> PullStream<ArraySource<u8, &'static [u8]>> {
        Processor::new(source::from_slice(data), PipeConfig::new(block).unwrap())
            .unwrap()
            .into_stream()
    }

    #[test]
    fn test_read_into_stops_at_chunk() {
        let mut s = stream(b"abcde", 2);
        let mut buf = [0u8; 8];
        assert_eq!(s.read_into(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(s.read_into(&mut buf[..1]).unwrap(), 1);
        assert_eq!(s.buffered(), b"d");
        assert_eq!(s.read_into(&mut buf).unwrap(), 1);
        assert_eq!(s.read_into(&mut buf).unwrap(), 1);
        assert_eq!(s.read_into(&mut buf).unwrap(), 0);
        assert_eq!(s.read_into(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_pending_chunks_are_skipped_over() {
        // Emits only on the terminal call.
        let mut held = Vec::new();
        let hold = from_fn(move |c: &[u8], end| {
            held.extend_from_slice(c);
            if end {
                Ok(Transformed::owned(std::mem::take(&mut held)))
            } else {
                Ok(Transformed::Pending)
            }
        });
        let mut s = Processor::new(source::from_slice(&b"xyz"[..]), PipeConfig::new(1).unwrap())
            .unwrap()
            .with_transformer(hold)
            .into_stream();
        let mut out = Vec::new();
        s.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"xyz");
        assert_eq!(s.consumed(), 3);
    }

    #[test]
    fn test_skip_across_chunks() {
        let mut s = stream(b"0123456789", 3);
        assert_eq!(s.skip(7).unwrap(), 7);
        assert_eq!(s.read_one().unwrap(), Some(b'7'));
        assert_eq!(s.skip(10).unwrap(), 2);
        assert_eq!(s.read_one().unwrap(), None);
    }

    #[test]
    fn test_close_then_read_fails() {
        let mut s = stream(b"abc", 2);
        assert_eq!(s.read_one().unwrap(), Some(b'a'));
        s.close().unwrap();
        s.close().unwrap();
        assert!(matches!(s.read_one(), Err(PipeError::Closed)));
        assert!(matches!(s.read_into(&mut [0u8; 1]), Err(PipeError::Closed)));
    }

    #[test]
    fn test_units() {
        let mut s = stream(b"hello", 4);
        let head: Vec<u8> = s.units().take(2).collect::<Result<_>>().unwrap();
        assert_eq!(head, b"he");
        // The stream stays usable after the iterator is dropped.
        assert_eq!(s.skip(1).unwrap(), 1);
        let rest: Result<Vec<u8>> = s.units().collect();
        assert_eq!(rest.unwrap(), b"lo");
    }

    #[test]
    fn test_skip_keeps_stream() {
        let mut s = stream(b"abc", 1);
        let skipped: u64 = s.skip(2).unwrap();
        assert_eq!(skipped, 2);
        assert_eq!(s.read_one().unwrap(), Some(b'c'));
    }

    #[test]
    fn test_mark_is_unsupported() {
        let mut s = stream(b"a", 1);
        assert!(matches!(s.mark(), Err(PipeError::MarkUnsupported)));
    }
}
