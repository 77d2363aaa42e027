//! Reader that drives a [`Coder`] between an origin and its caller.

use std::io;

use super::{Coder, CoderResult, CoderStep};
use crate::config::{DEFAULT_CODER_CAPACITY, validate_coder_capacity};
use crate::error::{PipeError, Result};
use crate::read::UnitRead;

/// State captured by [`CodecReader::mark`].
#[derive(Debug, Clone)]
struct Snapshot<I, O> {
    input: Box<[I]>,
    output: Box<[O]>,
    end_of_input: bool,
    finished: bool,
}

/// An origin of coded units: reads raw units from `origin`, runs them
/// through `coder`, and hands out the result.
///
/// Both working buffers have a fixed capacity and are compacted before each
/// coder call. Coded output is always drained completely before the coder
/// runs again.
///
/// Decoding (`u8` to `char`) and encoding (`char` to `u8`) are the same type
/// with a different coder.
///
/// # Mark/reset
///
/// [`mark`](UnitRead::mark) snapshots both buffers and marks the origin;
/// [`reset`](UnitRead::reset) restores them, resets the coder and rewinds
/// the origin. Only the latest mark is kept.
///
/// # Example
///
/// ```
/// use segpipe::{UnitRead, chars, codec};
///
/// let mut bytes = codec::encode_utf8(chars("añb"));
/// let mut out = [0u8; 8];
/// let n = bytes.read_into(&mut out)?;
/// assert_eq!(&out[..n], "añb".as_bytes());
/// # Ok::<(), segpipe::PipeError>(())
/// ```
#[derive(Debug)]
pub struct CodecReader<R, C: Coder> {
    origin: R,
    coder: C,
    input: Vec<C::Input>,
    in_start: usize,
    in_end: usize,
    output: Vec<C::Output>,
    out_start: usize,
    out_end: usize,
    end_of_input: bool,
    finished: bool,
    snapshot: Option<Snapshot<C::Input, C::Output>>,
    closed: bool,
}

impl<R, C> CodecReader<R, C>
where
    R: UnitRead<Unit = C::Input>,
    C: Coder,
{
    /// Creates a reader with the default buffer capacity.
    pub fn new(origin: R, coder: C) -> Self {
        Self::build(origin, coder, DEFAULT_CODER_CAPACITY)
    }

    /// Creates a reader whose working buffers hold `capacity` units each.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] if `capacity` is below
    /// [`MIN_CODER_CAPACITY`](crate::config::MIN_CODER_CAPACITY).
    pub fn with_capacity(origin: R, coder: C, capacity: usize) -> Result<Self> {
        validate_coder_capacity(capacity)?;
        Ok(Self::build(origin, coder, capacity))
    }

    fn build(origin: R, coder: C, capacity: usize) -> Self {
        Self {
            origin,
            coder,
            input: vec![Default::default(); capacity],
            in_start: 0,
            in_end: 0,
            output: vec![Default::default(); capacity],
            out_start: 0,
            out_end: 0,
            end_of_input: false,
            finished: false,
            snapshot: None,
            closed: false,
        }
    }

    /// Returns a reference to the coder.
    pub fn coder(&self) -> &C {
        &self.coder
    }

    /// Returns the origin.
    pub fn into_inner(self) -> R {
        self.origin
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(PipeError::Closed);
        }
        Ok(())
    }

    /// Pulls raw units into the free tail of the input buffer.
    fn fill(&mut self) -> Result<()> {
        self.compact_input();
        if self.in_end == self.input.len() {
            return Ok(());
        }
        let n = self.origin.read_into(&mut self.input[self.in_end..])?;
        if n == 0 {
            self.end_of_input = true;
        }
        self.in_end += n;
        Ok(())
    }

    fn compact_input(&mut self) {
        if self.in_start > 0 {
            self.input.copy_within(self.in_start..self.in_end, 0);
            self.in_end -= self.in_start;
            self.in_start = 0;
        }
    }

    /// Runs the coder once. Only called with the output buffer drained.
    fn code_pass(&mut self) -> Result<()> {
        debug_assert_eq!(self.out_start, self.out_end);
        self.out_start = 0;
        self.out_end = 0;
        self.compact_input();

        let last = self.end_of_input;
        let step: CoderStep =
            self.coder
                .code(&self.input[..self.in_end], &mut self.output[..], last);
        self.in_start = step.read;
        self.out_end = step.written;
        tracing::trace!(
            read = step.read,
            written = step.written,
            last,
            result = %step.result,
            "coder pass"
        );

        let pending = self.in_end - self.in_start;
        let stalled = step.read == 0 && step.written == 0;
        match step.result {
            CoderResult::Underflow => {
                if stalled && pending > 0 && (last || self.in_end == self.input.len()) {
                    // No more input can complete the pending sequence.
                    return Err(PipeError::Coding {
                        outcome: CoderResult::Malformed { length: pending },
                    });
                }
                if last && pending == 0 {
                    self.finished = true;
                }
                Ok(())
            }
            CoderResult::Overflow => {
                if stalled {
                    return Err(PipeError::InvalidConfig {
                        message: "codec buffer too small for one coded unit",
                    });
                }
                Ok(())
            }
            outcome => Err(PipeError::Coding { outcome }),
        }
    }
}

impl<R, C> UnitRead for CodecReader<R, C>
where
    R: UnitRead<Unit = C::Input>,
    C: Coder,
{
    type Unit = C::Output;

    fn read_one(&mut self) -> Result<Option<C::Output>> {
        let mut one = [C::Output::default()];
        match self.read_into(&mut one)? {
            0 => Ok(None),
            _ => Ok(Some(one[0])),
        }
    }

    fn read_into(&mut self, dst: &mut [C::Output]) -> Result<usize> {
        self.check_open()?;

        let mut n = 0;
        while n < dst.len() {
            if self.out_start < self.out_end {
                let k = (dst.len() - n).min(self.out_end - self.out_start);
                dst[n..n + k].copy_from_slice(&self.output[self.out_start..self.out_start + k]);
                self.out_start += k;
                n += k;
                continue;
            }

            if self.end_of_input {
                if self.in_start == self.in_end && self.finished {
                    break;
                }
                self.code_pass()?;
            } else {
                self.fill()?;
                self.code_pass()?;
            }
        }
        Ok(n)
    }

    fn mark(&mut self) -> Result<()> {
        self.check_open()?;
        if self.coder.holds_state() {
            return Err(PipeError::MarkUnsupported);
        }
        self.origin.mark()?;
        self.snapshot = Some(Snapshot {
            input: self.input[self.in_start..self.in_end].into(),
            output: self.output[self.out_start..self.out_end].into(),
            end_of_input: self.end_of_input,
            finished: self.finished,
        });
        tracing::debug!(
            buffered_input = self.in_end - self.in_start,
            buffered_output = self.out_end - self.out_start,
            "codec reader marked"
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.check_open()?;
        let snapshot = self.snapshot.as_ref().ok_or(PipeError::MarkNotSet)?;
        self.origin.reset()?;

        self.input[..snapshot.input.len()].copy_from_slice(&snapshot.input);
        self.in_start = 0;
        self.in_end = snapshot.input.len();
        self.output[..snapshot.output.len()].copy_from_slice(&snapshot.output);
        self.out_start = 0;
        self.out_end = snapshot.output.len();
        self.end_of_input = snapshot.end_of_input;
        self.finished = snapshot.finished;
        self.coder.reset();
        tracing::debug!("codec reader reset to mark");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.origin.close()?;
        }
        Ok(())
    }
}

impl<R, C> io::Read for CodecReader<R, C>
where
    R: UnitRead<Unit = C::Input>,
    C: Coder<Output = u8>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf)?)
    }
}
