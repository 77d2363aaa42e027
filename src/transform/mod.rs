//! Transformers and transformer chains.
//!
//! - [`Transformer`] - Stateful per-chunk transform
//! - [`Transformed`] - Output of one call, or `Pending` while buffering
//! - [`Identity`] - Pass-through
//! - [`Chain`] - Ordered transformers, short-circuiting on `Pending`
//! - [`Aligned`] - Feeds a transformer fixed-size or multiple-of-size blocks
//! - [`Buffered`] - Feeds a transformer its unconsumed previous input plus the new chunk

mod align;
mod buffered;

pub use align::{Aligned, Alignment};
pub use buffered::{Buffered, Window, WindowTransformer, windowed};

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;
use crate::segment::Unit;

/// Result of one [`Transformer::transform`] call.
///
/// Input that a transformer passes through unchanged stays borrowed; new
/// output is owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<'a, T: Unit> {
    /// Output for this call (possibly empty).
    Emit(Cow<'a, [T]>),

    /// Nothing to emit until more input arrives.
    Pending,
}

impl<'a, T: Unit> Transformed<'a, T> {
    /// Wraps owned output.
    pub fn owned(data: Vec<T>) -> Self {
        Transformed::Emit(Cow::Owned(data))
    }

    /// Returns true for [`Transformed::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, Transformed::Pending)
    }

    /// Returns the emitted data, if any.
    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Transformed::Emit(data) => Some(data),
            Transformed::Pending => None,
        }
    }

    /// Returns the emitted data as an owned vector.
    pub fn into_vec(self) -> Option<Vec<T>> {
        match self {
            Transformed::Emit(data) => Some(data.into_owned()),
            Transformed::Pending => None,
        }
    }

    /// Detaches the result from any borrowed input.
    pub fn into_owned(self) -> Transformed<'static, T> {
        match self {
            Transformed::Emit(data) => Transformed::Emit(Cow::Owned(data.into_owned())),
            Transformed::Pending => Transformed::Pending,
        }
    }
}

/// A stateful transform applied to each chunk of a stream.
///
/// `end` is true on the last call of a stream. On that call a transformer
/// must emit everything it still holds; it will not be called again for the
/// stream. [`Transformed::Pending`] means "buffered, nothing to emit yet".
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use segpipe::{Transformed, Transformer};
///
/// struct Upper;
///
/// impl Transformer<u8> for Upper {
///     fn transform<'a>(&mut self, chunk: Cow<'a, [u8]>, _end: bool) -> segpipe::Result<Transformed<'a, u8>> {
///         Ok(Transformed::owned(chunk.to_ascii_uppercase()))
///     }
/// }
///
/// let out = Upper.transform(Cow::Borrowed(&b"abc"[..]), true)?;
/// assert_eq!(out.as_slice(), Some(&b"ABC"[..]));
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub trait Transformer<T: Unit> {
    /// Transforms one chunk.
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>>;
}

impl<T: Unit, X: Transformer<T> + ?Sized> Transformer<T> for Box<X> {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        (**self).transform(chunk, end)
    }
}

impl<T: Unit, X: Transformer<T> + ?Sized> Transformer<T> for &mut X {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        (**self).transform(chunk, end)
    }
}

/// Passes every chunk through unchanged and without copying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T: Unit> Transformer<T> for Identity {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, _end: bool) -> Result<Transformed<'a, T>> {
        Ok(Transformed::Emit(chunk))
    }
}

/// A transformer built from a closure.
///
/// Created by [`from_fn`].
#[derive(Clone)]
pub struct FnTransformer<F> {
    f: F,
}

/// Creates a transformer from a closure over `(chunk, end)`.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use segpipe::{Transformed, Transformer, transform};
///
/// let mut reverse = transform::from_fn(|chunk: &[char], _end| {
///     Ok(Transformed::owned(chunk.iter().rev().copied().collect()))
/// });
/// let out = reverse.transform(Cow::Borrowed(&['a', 'b'][..]), false)?;
/// assert_eq!(out.into_vec(), Some(vec!['b', 'a']));
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub fn from_fn<T, F>(f: F) -> FnTransformer<F>
where
    T: Unit,
    F: FnMut(&[T], bool) -> Result<Transformed<'static, T>>,
{
    FnTransformer { f }
}

impl<F> fmt::Debug for FnTransformer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransformer").finish_non_exhaustive()
    }
}

impl<T, F> Transformer<T> for FnTransformer<F>
where
    T: Unit,
    F: FnMut(&[T], bool) -> Result<Transformed<'static, T>>,
{
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        (self.f)(&chunk, end)
    }
}

/// An ordered list of transformers.
///
/// The output of stage *i* is the input of stage *i + 1*. The first stage
/// that returns [`Transformed::Pending`] ends the call; later stages do not
/// see it. An empty chain passes chunks through.
pub struct Chain<T: Unit> {
    stages: Vec<Box<dyn Transformer<T>>>,
}

impl<T: Unit> Chain<T> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage.
    pub fn push(&mut self, stage: impl Transformer<T> + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Appends a stage, builder style.
    pub fn with(mut self, stage: impl Transformer<T> + 'static) -> Self {
        self.push(stage);
        self
    }

    /// Returns the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<T: Unit> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Unit> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl<T: Unit> Transformer<T> for Chain<T> {
    fn transform<'a>(&mut self, chunk: Cow<'a, [T]>, end: bool) -> Result<Transformed<'a, T>> {
        let mut current = chunk;
        for stage in &mut self.stages {
            match stage.transform(current, end)? {
                Transformed::Emit(out) => current = out,
                Transformed::Pending => return Ok(Transformed::Pending),
            }
        }
        Ok(Transformed::Emit(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_identity_borrows() {
        let data = [1u8, 2, 3];
        match Identity.transform(Cow::Borrowed(&data[..]), false).unwrap() {
            Transformed::Emit(Cow::Borrowed(out)) => assert_eq!(out, &data),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(std::mem::size_of::<Identity>(), 0);
    }

    #[test]
    fn test_empty_chain_passes_through() {
        let mut chain: Chain<char> = Chain::new();
        assert!(chain.is_empty());
        let out = chain.transform(Cow::Borrowed(&['x'][..]), true).unwrap();
        assert_eq!(out.as_slice(), Some(&['x'][..]));
    }

    #[test]
    fn test_chain_order() {
        let mut chain = Chain::new()
            .with(from_fn(|c: &[u8], _| {
                let mut v = c.to_vec();
                v.push(b'1');
                Ok(Transformed::owned(v))
            }))
            .with(from_fn(|c: &[u8], _| {
                let mut v = c.to_vec();
                v.push(b'2');
                Ok(Transformed::owned(v))
            }));
        assert_eq!(chain.len(), 2);
        let out = chain.transform(Cow::Borrowed(&b"x"[..]), false).unwrap();
        assert_eq!(out.into_vec(), Some(b"x12".to_vec()));
    }

    #[test]
    fn test_chain_short_circuits() {
        let second_calls = Rc::new(Cell::new(0));
        let seen = second_calls.clone();
        let mut chain = Chain::new()
            .with(from_fn(|_: &[u8], _| Ok(Transformed::Pending)))
            .with(from_fn(move |c: &[u8], _| {
                seen.set(seen.get() + 1);
                Ok(Transformed::owned(c.to_vec()))
            }));

        let out = chain.transform(Cow::Borrowed(&b"abc"[..]), true).unwrap();
        assert!(out.is_pending());
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn test_chain_propagates_errors() {
        let mut chain = Chain::new().with(from_fn(|_: &[char], _| {
            Err(crate::PipeError::transform("bad input"))
        }));
        let err = chain.transform(Cow::Borrowed(&['a'][..]), false).unwrap_err();
        assert!(err.to_string().contains("bad input"));
    }

    #[test]
    fn test_into_owned_detaches() {
        let owned = {
            let data = vec![9u8];
            Transformed::Emit(Cow::Borrowed(&data[..])).into_owned()
        };
        assert_eq!(owned.into_vec(), Some(vec![9]));
    }
}
