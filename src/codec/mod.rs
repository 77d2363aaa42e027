//! Incremental byte/char coders and the reader that drives them.
//!
//! A [`Coder`] converts between two unit types one buffer at a time and
//! reports whether it stopped for lack of input or lack of output room.
//! [`CodecReader`] pulls raw units from an origin and exposes the coded
//! units as another origin.
//!
//! - [`Utf8Decoder`] / [`Utf8Encoder`] - UTF-8 bytes to and from chars
//! - [`CharsetDecoder`] / [`CharsetEncoder`] - any WHATWG encoding (feature `charset`)
//!
//! # Example
//!
//! ```
//! use segpipe::{UnitRead, SliceReader, codec};
//!
//! let mut reader = codec::decode_utf8(SliceReader::new("héllo".as_bytes()));
//! let mut out = ['\0'; 8];
//! let n = reader.read_into(&mut out)?;
//! assert_eq!(out[..n].iter().collect::<String>(), "héllo");
//! # Ok::<(), segpipe::PipeError>(())
//! ```

#[cfg(feature = "charset")]
mod charset;
mod reader;
mod utf8;

#[cfg(feature = "charset")]
pub use charset::{CharsetDecoder, CharsetEncoder};
pub use reader::CodecReader;
pub use utf8::{Utf8Decoder, Utf8Encoder};

use std::fmt;

use crate::read::UnitRead;
use crate::segment::Unit;

/// Why a coder returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoderResult {
    /// All input consumed, or the rest is an incomplete sequence.
    Underflow,

    /// The output buffer has no room for the next coded unit.
    Overflow,

    /// The input holds an invalid sequence of `length` units.
    Malformed {
        /// Length of the offending sequence.
        length: usize,
    },

    /// The input holds `length` units with no mapping in the target set.
    Unmappable {
        /// Length of the offending sequence.
        length: usize,
    },
}

impl CoderResult {
    /// Returns true for malformed or unmappable input.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CoderResult::Malformed { .. } | CoderResult::Unmappable { .. }
        )
    }
}

impl fmt::Display for CoderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoderResult::Underflow => write!(f, "needs more input"),
            CoderResult::Overflow => write!(f, "needs more output space"),
            CoderResult::Malformed { length } => write!(f, "malformed input of length {}", length),
            CoderResult::Unmappable { length } => {
                write!(f, "unmappable input of length {}", length)
            }
        }
    }
}

/// Outcome of one [`Coder::code`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoderStep {
    /// Why the coder stopped.
    pub result: CoderResult,
    /// Input units consumed.
    pub read: usize,
    /// Output units produced.
    pub written: usize,
}

impl CoderStep {
    /// Creates a step.
    pub fn new(result: CoderResult, read: usize, written: usize) -> Self {
        Self {
            result,
            read,
            written,
        }
    }
}

/// An incremental converter from `Input` units to `Output` units.
///
/// Contract:
/// - Consume as much input and produce as much output as possible, then
///   report [`CoderResult::Underflow`] or [`CoderResult::Overflow`].
/// - An incomplete trailing sequence is left unconsumed (`Underflow`) unless
///   `last` is set, in which case it is malformed.
/// - [`reset`](Coder::reset) returns the coder to its initial state.
/// - Between calls the coder is in its initial state, unless it reports
///   [`holds_state`](Coder::holds_state).
pub trait Coder {
    /// Units consumed.
    type Input: Unit;
    /// Units produced.
    type Output: Unit;

    /// Codes `input` into `output`.
    fn code(&mut self, input: &[Self::Input], output: &mut [Self::Output], last: bool) -> CoderStep;

    /// Forgets any internal state.
    fn reset(&mut self);

    /// Returns true if the coder keeps state between calls that its
    /// unconsumed input does not describe. A [`CodecReader`] over such a
    /// coder cannot be marked.
    fn holds_state(&self) -> bool {
        false
    }
}

/// Decodes UTF-8 bytes from `origin` into chars.
pub fn decode_utf8<R: UnitRead<Unit = u8>>(origin: R) -> CodecReader<R, Utf8Decoder> {
    CodecReader::new(origin, Utf8Decoder::new())
}

/// Encodes chars from `origin` into UTF-8 bytes.
pub fn encode_utf8<R: UnitRead<Unit = char>>(origin: R) -> CodecReader<R, Utf8Encoder> {
    CodecReader::new(origin, Utf8Encoder::new())
}
