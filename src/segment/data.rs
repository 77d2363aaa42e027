//! The Segment type - one read from a chunk source.

use std::fmt;

use super::Unit;

/// A chunk of data read from a [`ChunkSource`](crate::ChunkSource).
///
/// The data view borrows the source's storage for the duration of one read;
/// the source may overwrite that storage on the next call. Anything that has
/// to outlive the read must be copied (`to_vec`).
///
/// # Example
///
/// ```
/// use segpipe::Segment;
///
/// let seg = Segment::new(&b"hello"[..], false);
/// assert_eq!(seg.len(), 5);
/// assert!(!seg.is_end());
///
/// let last: Segment<'_, u8> = Segment::end();
/// assert!(last.is_end() && last.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a, T> {
    /// The units of this read.
    pub data: &'a [T],

    /// True if the source is exhausted after this segment.
    pub end: bool,
}

impl<'a, T: Unit> Segment<'a, T> {
    /// Creates a segment over `data`.
    pub fn new(data: &'a [T], end: bool) -> Self {
        Self { data, end }
    }

    /// Creates a non-terminal segment.
    pub fn more(data: &'a [T]) -> Self {
        Self { data, end: false }
    }

    /// Creates the empty terminal segment.
    pub fn end() -> Self {
        Self { data: &[], end: true }
    }

    /// Returns the number of units in the segment.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the segment carries no units.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if this is the terminal segment.
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// Copies the data out of the source's storage.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T: Unit> fmt::Display for Segment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment({} {}s", self.len(), T::NAME)?;
        if self.end {
            write!(f, ", end")?;
        }
        write!(f, ")")
    }
}
