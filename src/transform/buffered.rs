//! Look-back adapter - lets a transformer see input it has not consumed yet.

use std::borrow::Cow;
use std::fmt;
use std::mem;

use super::{Transformed, Transformer};
use crate::error::Result;
use crate::segment::Unit;

/// Output of one [`WindowTransformer`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<T: Unit> {
    /// What to emit for this call.
    pub output: Transformed<'static, T>,

    /// Units of the window that are done with; the rest is offered again.
    pub consumed: usize,
}

impl<T: Unit> Window<T> {
    /// Emits `output` after consuming `consumed` units.
    pub fn emit(output: Vec<T>, consumed: usize) -> Self {
        Self {
            output: Transformed::owned(output),
            consumed,
        }
    }

    /// Emits nothing and keeps the whole window for the next call.
    pub fn wait() -> Self {
        Self {
            output: Transformed::Pending,
            consumed: 0,
        }
    }
}

/// A transformer that works on a window of unconsumed input.
///
/// Each call reports how much of the window it consumed; [`Buffered`] keeps
/// the remainder and prepends it to the next chunk.
pub trait WindowTransformer<T: Unit> {
    /// Processes `window`, the unconsumed previous input followed by the new chunk.
    fn transform_window(&mut self, window: &[T], end: bool) -> Result<Window<T>>;
}

impl<T, F> WindowTransformer<T> for F
where
    T: Unit,
    F: FnMut(&[T], bool) -> Result<Window<T>>,
{
    fn transform_window(&mut self, window: &[T], end: bool) -> Result<Window<T>> {
        self(window, end)
    }
}

/// Creates a [`Buffered`] transformer from a closure over `(window, end)`.
///
/// # Example
///
/// Emitting only complete lines:
///
/// ```
/// use std::borrow::Cow;
/// use segpipe::{Transformer, Window, transform};
///
/// let mut lines = transform::windowed(|window: &[u8], end| {
///     let cut = if end {
///         window.len()
///     } else {
///         window.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1)
///     };
///     Ok(Window::emit(window[..cut].to_vec(), cut))
/// });
///
/// let out = lines.transform(Cow::Borrowed(&b"one\ntw"[..]), false)?;
/// assert_eq!(out.as_slice(), Some(&b"one\n"[..]));
/// let out = lines.transform(Cow::Borrowed(&b"o\n"[..]), true)?;
/// assert_eq!(out.as_slice(), Some(&b"two\n"[..]));
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub fn windowed<T, F>(f: F) -> Buffered<T, F>
where
    T: Unit,
    F: FnMut(&[T], bool) -> Result<Window<T>>,
{
    Buffered::new(f)
}

/// Adapts a [`WindowTransformer`] into a [`Transformer`].
///
/// The window handed to the inner transformer is the unconsumed tail of
/// earlier calls followed by the new chunk. On the last call the inner
/// transformer must consume everything; whatever it leaves is dropped.
pub struct Buffered<T: Unit, X> {
    inner: X,
    remainder: Vec<T>,
}

impl<T: Unit, X: WindowTransformer<T>> Buffered<T, X> {
    /// Wraps `inner`.
    pub fn new(inner: X) -> Self {
        Self {
            inner,
            remainder: Vec::new(),
        }
    }

    /// Returns the number of units held back for the next call.
    pub fn retained(&self) -> usize {
        self.remainder.len()
    }

    /// Returns the wrapped transformer.
    pub fn into_inner(self) -> X {
        self.inner
    }
}

impl<T: Unit, X: WindowTransformer<T>> Transformer<T> for Buffered<T, X> {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        let window: Cow<'_, [T]> = if self.remainder.is_empty() {
            chunk
        } else {
            self.remainder.extend_from_slice(&chunk);
            Cow::Owned(mem::take(&mut self.remainder))
        };

        let Window { output, consumed } = self.inner.transform_window(&window, end)?;
        let consumed = consumed.min(window.len());

        if end {
            self.remainder.clear();
        } else {
            match window {
                Cow::Owned(mut held) => {
                    held.drain(..consumed);
                    self.remainder = held;
                }
                Cow::Borrowed(data) => self.remainder.extend_from_slice(&data[consumed..]),
            }
        }
        tracing::trace!(consumed, retained = self.remainder.len(), end, "window processed");
        Ok(output)
    }
}

impl<T: Unit, X> fmt::Debug for Buffered<T, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffered")
            .field("retained", &self.remainder.len())
            .finish_non_exhaustive()
    }
}
