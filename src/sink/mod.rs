//! Writable destinations.
//!
//! - [`Sink`] - Destination for transformed output
//! - [`IoSink`] - Any [`std::io::Write`] as a byte destination
//! - [`SliceSink`] - Fixed array with bounds checking
//! - [`Discard`] - Accepts and drops everything
//!
//! `Vec<T>`, `String` and `bytes::BytesMut` are sinks out of the box.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use crate::error::{PipeError, Result};
use crate::segment::Unit;

/// A destination for units.
pub trait Sink<T: Unit> {
    /// Writes all of `data`.
    fn write(&mut self, data: &[T]) -> Result<()>;

    /// Flushes buffered output, if any.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Releases the destination. Calling it again is a no-op.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }
}

impl<T: Unit, S: Sink<T> + ?Sized> Sink<T> for &mut S {
    fn write(&mut self, data: &[T]) -> Result<()> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<T: Unit> Sink<T> for Vec<T> {
    fn write(&mut self, data: &[T]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl Sink<char> for String {
    fn write(&mut self, data: &[char]) -> Result<()> {
        self.extend(data);
        Ok(())
    }
}

impl Sink<u8> for BytesMut {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.put_slice(data);
        Ok(())
    }
}

/// A sink that drops everything written to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl<T: Unit> Sink<T> for Discard {
    fn write(&mut self, _data: &[T]) -> Result<()> {
        Ok(())
    }
}

/// A byte destination over any [`std::io::Write`].
///
/// The writer is flushed and dropped on [`close`](Sink::close); writes after
/// that fail with [`PipeError::Closed`].
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: Option<W>,
}

impl<W: Write> IoSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Some(writer),
        }
    }

    /// Returns the writer, or `None` once closed.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }

    fn writer(&mut self) -> Result<&mut W> {
        self.inner.as_mut().ok_or(PipeError::Closed)
    }
}

impl<W: Write> Sink<u8> for IoSink<W> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer()?.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer()?.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.inner.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// A destination over a fixed array.
///
/// Writing past the end fails with [`PipeError::Overflow`] and writes nothing.
///
/// # Example
///
/// ```
/// use segpipe::{Sink, SliceSink};
///
/// let mut buf = [0u8; 4];
/// let mut sink = SliceSink::new(&mut buf);
/// sink.write(b"abc")?;
/// assert!(sink.write(b"de").is_err());
/// assert_eq!(sink.written(), b"abc");
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug)]
pub struct SliceSink<'a, T> {
    buf: &'a mut [T],
    pos: usize,
}

impl<'a, T: Unit> SliceSink<'a, T> {
    /// Creates a sink writing from the start of `buf`.
    pub fn new(buf: &'a mut [T]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the filled part of the array.
    pub fn written(&self) -> &[T] {
        &self.buf[..self.pos]
    }

    /// Returns the number of units written.
    pub fn len(&self) -> usize {
        self.pos
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl<T: Unit> Sink<T> for SliceSink<'_, T> {
    fn write(&mut self, data: &[T]) -> Result<()> {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            return Err(PipeError::Overflow {
                capacity: self.buf.len(),
            });
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_and_string() {
        let mut v: Vec<u8> = Vec::new();
        Sink::write(&mut v, b"ab").unwrap();
        Sink::write(&mut v, b"c").unwrap();
        assert_eq!(v, b"abc");

        let mut s = String::new();
        s.write(&['h', 'é']).unwrap();
        assert_eq!(s, "hé");
    }

    #[test]
    fn test_bytes_mut() {
        let mut b = BytesMut::new();
        b.write(b"xyz").unwrap();
        assert_eq!(&b[..], b"xyz");
    }

    #[test]
    fn test_io_sink() {
        let mut sink = IoSink::new(Vec::new());
        sink.write(b"data").unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write(b"x"), Err(PipeError::Closed)));
    }

    #[test]
    fn test_discard() {
        let mut sink = Discard;
        Sink::<u8>::write(&mut sink, b"abc").unwrap();
        Sink::<char>::write(&mut sink, &['x']).unwrap();
        assert!(Sink::<u8>::close(&mut sink).is_ok());
    }

    #[test]
    fn test_slice_sink_overflow() {
        let mut buf = ['-'; 3];
        let mut sink = SliceSink::new(&mut buf);
        assert!(sink.is_empty());
        sink.write(&['a', 'b']).unwrap();
        let err = sink.write(&['c', 'd']).unwrap_err();
        assert!(matches!(err, PipeError::Overflow { capacity: 3 }));
        assert_eq!(sink.len(), 2);
        sink.write(&['c']).unwrap();
        assert_eq!(sink.written(), &['a', 'b', 'c']);
    }
}
