//! Chunk sources.
//!
//! A [`ChunkSource`] hands out [`Segment`]s on demand. The segment's data
//! borrows the source until the next call, so sources can reuse one internal
//! buffer for every read.
//!
//! - [`ArraySource`] - Zero-copy segments over in-memory storage
//! - [`ReaderSource`] - Buffered segments over any [`UnitRead`] origin
//! - [`Limit`] - Caps the number of units a source yields
//!
//! The free functions below build sources for the common origins.

mod array;
mod limit;
mod reader;

pub use array::ArraySource;
pub use limit::Limit;
pub use reader::ReaderSource;

use std::io::{Read, Seek};

use crate::codec::{CodecReader, Coder};
use crate::error::Result;
use crate::read::{IoReader, SeekReader, SliceReader, UnitRead};
use crate::segment::{Segment, Unit};

/// A pull-based producer of [`Segment`]s.
///
/// Contract:
/// - `read(n)` returns at most `n` units; an exhausted source returns an
///   empty segment with `end = true`.
/// - The terminal segment is produced once by the origin; later reads return
///   the empty terminal segment again without touching the origin.
/// - `read(0)` returns an empty non-terminal segment unless the source is
///   already known to be exhausted.
/// - After [`close`](ChunkSource::close) every read fails with
///   [`PipeError::Closed`](crate::PipeError::Closed).
pub trait ChunkSource {
    /// Element type of the segments.
    type Unit: Unit;

    /// Reads up to `max_units` units.
    fn read(&mut self, max_units: usize) -> Result<Segment<'_, Self::Unit>>;

    /// Releases the underlying handle. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Returns a view that yields at most `n` units before forcing end-of-stream.
    ///
    /// # Example
    ///
    /// ```
    /// use segpipe::{ChunkSource, source};
    ///
    /// let mut src = source::from_slice(&b"abcdef"[..]).limit(2);
    /// assert_eq!(src.read(10)?.data, b"ab");
    /// assert!(src.read(10)?.end);
    /// # Ok::<(), segpipe::PipeError>(())
    /// ```
    fn limit(self, n: u64) -> Limit<Self>
    where
        Self: Sized,
    {
        Limit::new(self, n)
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    type Unit = S::Unit;

    fn read(&mut self, max_units: usize) -> Result<Segment<'_, Self::Unit>> {
        (**self).read(max_units)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    type Unit = S::Unit;

    fn read(&mut self, max_units: usize) -> Result<Segment<'_, Self::Unit>> {
        (**self).read(max_units)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Source over an in-memory array of units.
pub fn from_slice<T: Unit, B: AsRef<[T]>>(data: B) -> ArraySource<T, B> {
    ArraySource::new(data)
}

/// Character source over a string.
pub fn from_str(s: &str) -> ReaderSource<SliceReader<char, Vec<char>>> {
    ReaderSource::new(crate::read::chars(s))
}

/// Byte source over a blocking [`std::io::Read`] channel.
pub fn from_reader<R: Read>(reader: R) -> ReaderSource<IoReader<R>> {
    ReaderSource::new(IoReader::new(reader))
}

/// Byte source over a random-access origin, starting at `offset`.
///
/// # Errors
///
/// Returns [`PipeError::InvalidConfig`](crate::PipeError::InvalidConfig) if
/// `offset` is past the end of the origin.
pub fn from_seekable<R: Read + Seek>(reader: R, offset: u64) -> Result<ReaderSource<SeekReader<R>>> {
    Ok(ReaderSource::new(SeekReader::at_offset(reader, offset)?))
}

/// Character source decoding the bytes of `origin` with `decoder`.
///
/// # Example
///
/// ```
/// use segpipe::{ChunkSource, SliceReader, Utf8Decoder, source};
///
/// let mut src = source::decode(SliceReader::new("héllo".as_bytes()), Utf8Decoder::new());
/// assert_eq!(src.read(16)?.data, &['h', 'é', 'l', 'l', 'o']);
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub fn decode<R, C>(origin: R, decoder: C) -> ReaderSource<CodecReader<R, C>>
where
    R: UnitRead<Unit = u8>,
    C: Coder<Input = u8, Output = char>,
{
    ReaderSource::new(CodecReader::new(origin, decoder))
}

/// Byte source encoding the characters of `origin` with `encoder`.
pub fn encode<R, C>(origin: R, encoder: C) -> ReaderSource<CodecReader<R, C>>
where
    R: UnitRead<Unit = char>,
    C: Coder<Input = char, Output = u8>,
{
    ReaderSource::new(CodecReader::new(origin, encoder))
}
