//! Alignment adapter - feeds a size-sensitive transformer aligned blocks.
//!
//! A block codec may need exactly `size` units per call, or any multiple of
//! `size`. The pipeline reads whatever the source hands out, so [`Aligned`]
//! keeps a carry buffer of fewer than `size` units between calls and re-merges
//! it with the next chunk.
//!
//! # Example
//!
//! ```
//! use std::borrow::Cow;
//! use segpipe::{Aligned, Identity, Transformer};
//!
//! let mut aligned = Aligned::fixed(Identity, 3)?;
//!
//! // "ab" is carried until a full block is available.
//! assert!(aligned.transform(Cow::Borrowed(&b"ab"[..]), false)?.is_pending());
//! let out = aligned.transform(Cow::Borrowed(&b"cd"[..]), false)?;
//! assert_eq!(out.as_slice(), Some(&b"abc"[..]));
//! assert_eq!(aligned.carried(), 1);
//!
//! // The last call flushes whatever is left.
//! let out = aligned.transform(Cow::Borrowed(&b"e"[..]), true)?;
//! assert_eq!(out.as_slice(), Some(&b"de"[..]));
//! # Ok::<(), segpipe::PipeError>(())
//! ```

use std::borrow::Cow;
use std::mem;

use super::{Transformed, Transformer};
use crate::error::{PipeError, Result};
use crate::segment::Unit;
use crate::util::Merge;

/// Input granularity required by the wrapped transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Exactly `size` units per call.
    Fixed(usize),

    /// Any non-zero multiple of `size` units per call.
    Multiple(usize),
}

impl Alignment {
    /// Returns the alignment unit.
    pub fn size(&self) -> usize {
        match *self {
            Alignment::Fixed(size) | Alignment::Multiple(size) => size,
        }
    }
}

/// Wraps a transformer so it only ever sees aligned input.
///
/// Guarantees to the wrapped transformer:
/// - every non-final call gets an aligned block (see [`Alignment`]);
/// - exactly one call per stream has `end = true`, carrying the final
///   `0..size` leftover units, even when nothing is left;
/// - every input unit is passed exactly once, in order.
pub struct Aligned<T: Unit, X> {
    inner: X,
    alignment: Alignment,
    carry: Vec<T>,
}

impl<T: Unit, X: Transformer<T>> Aligned<T, X> {
    /// Wraps `inner` with the given alignment.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] if the alignment size is zero.
    pub fn new(inner: X, alignment: Alignment) -> Result<Self> {
        let size = alignment.size();
        if size == 0 {
            return Err(PipeError::InvalidConfig {
                message: "alignment size must be non-zero",
            });
        }
        Ok(Self {
            inner,
            alignment,
            carry: Vec::with_capacity(size),
        })
    }

    /// Feeds `inner` blocks of exactly `size` units.
    pub fn fixed(inner: X, size: usize) -> Result<Self> {
        Self::new(inner, Alignment::Fixed(size))
    }

    /// Feeds `inner` blocks whose length is a multiple of `size`.
    pub fn multiple(inner: X, size: usize) -> Result<Self> {
        Self::new(inner, Alignment::Multiple(size))
    }

    /// Returns the alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Returns the number of units waiting in the carry buffer.
    pub fn carried(&self) -> usize {
        self.carry.len()
    }

    /// Returns a reference to the wrapped transformer.
    pub fn get_ref(&self) -> &X {
        &self.inner
    }

    /// Returns the wrapped transformer, dropping any carried units.
    pub fn into_inner(self) -> X {
        self.inner
    }

    /// Passes the whole carry buffer to the wrapped transformer.
    fn flush_carry<'b>(&mut self, end: bool) -> Result<Transformed<'b, T>> {
        let size = self.alignment.size();
        let block = mem::replace(&mut self.carry, Vec::with_capacity(size));
        tracing::trace!(units = block.len(), end, "flushing carry");
        self.inner.transform(Cow::Owned(block), end)
    }

    fn align<'b>(&mut self, data: &'b [T], end: bool) -> Result<Transformed<'b, T>> {
        let size = self.alignment.size();
        let mut merged = Merge::new();
        let mut rest = data;

        // Top up the carry first so units stay in order.
        if !self.carry.is_empty() {
            let take = (size - self.carry.len()).min(rest.len());
            self.carry.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.carry.len() < size {
                if !end {
                    return Ok(Transformed::Pending);
                }
                return self.flush_carry(true);
            }

            let last = end && rest.is_empty();
            let out = self.flush_carry(last)?;
            if last {
                return Ok(out);
            }
            merged.push(out);
        }

        let (middle, residual) = rest.split_at(rest.len() - rest.len() % size);
        let mut terminal_sent = false;
        if !middle.is_empty() {
            let last = end && residual.is_empty();
            match self.alignment {
                Alignment::Fixed(_) => {
                    let count = middle.len() / size;
                    for (i, block) in middle.chunks_exact(size).enumerate() {
                        let block_end = last && i + 1 == count;
                        merged.push(self.inner.transform(Cow::Borrowed(block), block_end)?);
                    }
                }
                Alignment::Multiple(_) => {
                    merged.push(self.inner.transform(Cow::Borrowed(middle), last)?);
                }
            }
            terminal_sent = last;
        }

        self.carry.extend_from_slice(residual);
        if end && !terminal_sent {
            let out = self.flush_carry(true)?;
            if merged.is_empty() {
                // Nothing else happened this call; the terminal result stands alone.
                return Ok(out);
            }
            merged.push(out);
        }

        match merged.finish() {
            // Later stages of a chain still need their terminal call.
            Transformed::Pending if end => Ok(Transformed::Emit(Cow::Borrowed(&[]))),
            merged => Ok(merged),
        }
    }
}

impl<T: Unit, X: Transformer<T>> Transformer<T> for Aligned<T, X> {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        match chunk {
            Cow::Borrowed(data) => self.align(data, end),
            Cow::Owned(data) => Ok(self.align(&data, end)?.into_owned()),
        }
    }
}

impl<T: Unit, X: std::fmt::Debug> std::fmt::Debug for Aligned<T, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aligned")
            .field("inner", &self.inner)
            .field("alignment", &self.alignment)
            .field("carried", &self.carry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Identity;

    /// Records every call it receives and echoes the input.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<(Vec<u8>, bool)>,
    }

    impl Transformer<u8> for Recorder {
        fn transform<'a>(&mut self, chunk: Cow<'a, [u8]>, end: bool) -> Result<Transformed<'a, u8>> {
            self.calls.push((chunk.to_vec(), end));
            Ok(Transformed::Emit(chunk))
        }
    }

    fn run(aligned: &mut Aligned<u8, Recorder>, data: &[u8], block: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in data.chunks(block) {
            if let Some(o) = aligned.transform(Cow::Borrowed(chunk), false).unwrap().as_slice() {
                out.extend_from_slice(o);
            }
        }
        if let Some(o) = aligned.transform(Cow::Borrowed(&[][..]), true).unwrap().as_slice() {
            out.extend_from_slice(o);
        }
        out
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Aligned::<char, _>::fixed(Identity, 0).is_err());
        assert!(Aligned::<u8, _>::multiple(Identity, 0).is_err());
    }

    #[test]
    fn test_abcde_block_two_size_three() {
        let mut aligned = Aligned::fixed(Recorder::default(), 3).unwrap();
        let out = run(&mut aligned, b"abcde", 2);
        assert_eq!(out, b"abcde");
        assert_eq!(
            aligned.get_ref().calls,
            vec![(b"abc".to_vec(), false), (b"de".to_vec(), true)]
        );
    }

    #[test]
    fn test_fixed_splits_middle_into_blocks() {
        let mut aligned = Aligned::fixed(Recorder::default(), 2).unwrap();
        let out = aligned.transform(Cow::Borrowed(&b"abcdefg"[..]), false).unwrap();
        assert_eq!(out.as_slice(), Some(&b"abcdef"[..]));
        assert_eq!(aligned.carried(), 1);
        let lens: Vec<usize> = aligned.get_ref().calls.iter().map(|c| c.0.len()).collect();
        assert_eq!(lens, vec![2, 2, 2]);
    }

    #[test]
    fn test_multiple_passes_middle_at_once() {
        let mut aligned = Aligned::multiple(Recorder::default(), 2).unwrap();
        aligned.transform(Cow::Borrowed(&b"abcdefg"[..]), false).unwrap();
        assert_eq!(aligned.get_ref().calls, vec![(b"abcdef".to_vec(), false)]);
    }

    #[test]
    fn test_exact_end_marks_last_block() {
        let mut aligned = Aligned::fixed(Recorder::default(), 2).unwrap();
        let out = aligned.transform(Cow::Borrowed(&b"abcd"[..]), true).unwrap();
        assert_eq!(out.as_slice(), Some(&b"abcd"[..]));
        assert_eq!(
            aligned.get_ref().calls,
            vec![(b"ab".to_vec(), false), (b"cd".to_vec(), true)]
        );
    }

    #[test]
    fn test_terminal_call_on_empty_stream() {
        let mut aligned = Aligned::fixed(Recorder::default(), 4).unwrap();
        let out = aligned.transform(Cow::Borrowed(&[][..]), true).unwrap();
        assert_eq!(out.as_slice(), Some(&[][..]));
        assert_eq!(aligned.get_ref().calls, vec![(Vec::new(), true)]);
    }

    #[test]
    fn test_terminal_call_after_aligned_input() {
        // Input ends on a block boundary, then an empty terminal chunk arrives.
        let mut aligned = Aligned::fixed(Recorder::default(), 2).unwrap();
        aligned.transform(Cow::Borrowed(&b"ab"[..]), false).unwrap();
        aligned.transform(Cow::Borrowed(&[][..]), true).unwrap();
        let ends = aligned.get_ref().calls.iter().filter(|c| c.1).count();
        assert_eq!(ends, 1);
        assert_eq!(aligned.get_ref().calls.last(), Some(&(Vec::new(), true)));
    }

    #[test]
    fn test_full_carry_at_end() {
        let mut aligned = Aligned::fixed(Recorder::default(), 3).unwrap();
        aligned.transform(Cow::Borrowed(&b"ab"[..]), false).unwrap();
        let out = aligned.transform(Cow::Borrowed(&b"c"[..]), true).unwrap();
        assert_eq!(out.as_slice(), Some(&b"abc"[..]));
        assert_eq!(aligned.get_ref().calls, vec![(b"abc".to_vec(), true)]);
        assert_eq!(aligned.carried(), 0);
    }

    #[test]
    fn test_carry_then_blocks_then_residual_at_end() {
        let mut aligned = Aligned::fixed(Recorder::default(), 2).unwrap();
        aligned.transform(Cow::Borrowed(&b"a"[..]), false).unwrap();
        let out = aligned.transform(Cow::Borrowed(&b"bcdef"[..]), true).unwrap();
        assert_eq!(out.as_slice(), Some(&b"abcdef"[..]));
        assert_eq!(
            aligned.get_ref().calls,
            vec![
                (b"ab".to_vec(), false),
                (b"cd".to_vec(), false),
                (b"ef".to_vec(), true),
            ]
        );
    }

    #[test]
    fn test_owned_input() {
        let mut aligned = Aligned::multiple(Identity, 4).unwrap();
        let out = aligned
            .transform(Cow::Owned(b"abcdef".to_vec()), false)
            .unwrap();
        assert_eq!(out.into_vec(), Some(b"abcd".to_vec()));
        let out = aligned.transform(Cow::Owned(Vec::new()), true).unwrap();
        assert_eq!(out.into_vec(), Some(b"ef".to_vec()));
    }

    #[test]
    fn test_round_trip_sizes() {
        let s = 4;
        for n in [0, 1, s - 1, s, s + 1, 2 * s, 2 * s + 1] {
            for block in 1..=(2 * s + 2) {
                let data: Vec<u8> = (0..n as u8).collect();
                for fixed in [true, false] {
                    let mut aligned = if fixed {
                        Aligned::fixed(Recorder::default(), s).unwrap()
                    } else {
                        Aligned::multiple(Recorder::default(), s).unwrap()
                    };
                    assert_eq!(run(&mut aligned, &data, block), data, "n={} block={}", n, block);

                    let calls = &aligned.get_ref().calls;
                    let fed: usize = calls.iter().map(|c| c.0.len()).sum();
                    assert_eq!(fed, n);
                    assert_eq!(calls.iter().filter(|c| c.1).count(), 1);
                    assert!(calls.last().is_some_and(|c| c.1));
                }
            }
        }
    }
}
