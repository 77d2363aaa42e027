//! Processor - owns the source, the transformer chain and the read limit.
//!
//! A processor is configured, then consumed by exactly one terminal
//! operation:
//!
//! - [`Processor::process_to`] - Write every transformed chunk into a [`Sink`]
//! - [`Processor::process`] - Run for side effects only, dropping the output
//! - [`Processor::to_vec`] - Collect the output in memory
//! - [`Processor::into_stream`] - Hand the output out through a [`PullStream`]
//!
//! Character processors also offer [`Processor::into_string`] and
//! [`Processor::into_encoder`].
//!
//! # Example
//!
//! ```
//! use segpipe::{PipeConfig, Processor, Transformed, source, transform};
//!
//! let upper = transform::from_fn(|chunk: &[u8], _end| Ok(Transformed::owned(chunk.to_ascii_uppercase())));
//! let processor = Processor::new(source::from_slice(&b"hello"[..]), PipeConfig::new(2)?)?
//!     .with_transformer(upper);
//!
//! let mut out = Vec::new();
//! assert_eq!(processor.process_to(&mut out)?, Some(5));
//! assert_eq!(out, b"HELLO");
//! # Ok::<(), segpipe::PipeError>(())
//! ```

use std::borrow::Cow;
use std::fmt;

use super::PullStream;
use crate::codec::{CodecReader, Coder};
use crate::config::PipeConfig;
use crate::error::Result;
use crate::segment::Segment;
use crate::sink::{Discard, Sink};
use crate::source::{self, ChunkSource, ReaderSource};
use crate::transform::{Chain, Transformed, Transformer};

/// One read + transform iteration.
pub(crate) struct Step<'a, T: crate::Unit> {
    /// Chain output for this iteration.
    pub(crate) output: Transformed<'a, T>,

    /// True once the terminal segment has gone through the chain.
    pub(crate) end: bool,
}

/// Pulls segments from a source and threads them through a transformer chain.
///
/// Each iteration reads at most `block_size` units (or whatever is left of
/// the read limit, if smaller). Once the limit is used up the source is no
/// longer read and the chain receives an empty terminal segment.
pub struct Processor<S: ChunkSource> {
    source: S,
    chain: Chain<S::Unit>,
    config: PipeConfig,

    /// Units still allowed by the read limit.
    remaining: Option<u64>,
    consumed: u64,
    finished: bool,
}

impl<S: ChunkSource> Processor<S> {
    /// Creates a processor over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`](crate::PipeError::InvalidConfig)
    /// if `config` does not validate. Nothing is read from the source.
    pub fn new(source: S, config: PipeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            chain: Chain::new(),
            config,
            remaining: config.read_limit(),
            consumed: 0,
            finished: false,
        })
    }

    /// Appends a transformer to the chain.
    pub fn with_transformer(mut self, transformer: impl Transformer<S::Unit> + 'static) -> Self {
        self.chain.push(transformer);
        self
    }

    /// Replaces the transformer chain.
    pub fn with_chain(mut self, chain: Chain<S::Unit>) -> Self {
        self.chain = chain;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    /// Returns the number of source units read so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns true once the terminal segment has been processed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Runs the loop to completion, writing every non-empty result to `sink`.
    ///
    /// Returns `None` if the source yielded no units at all, otherwise the
    /// total number of source units read. That count can differ from the
    /// number of units written.
    ///
    /// The sink is flushed but not closed. A failure from the source, a
    /// transformer or the sink aborts the loop.
    pub fn process_to<K: Sink<S::Unit>>(mut self, mut sink: K) -> Result<Option<u64>> {
        tracing::debug!(
            block_size = self.config.block_size(),
            read_limit = ?self.config.read_limit(),
            stages = self.chain.len(),
            "processing started"
        );

        loop {
            let step = self.step()?;
            if let Some(data) = step.output.as_slice() {
                if !data.is_empty() {
                    sink.write(data)?;
                }
            }
            if step.end {
                break;
            }
        }
        sink.flush()?;

        tracing::debug!(consumed = self.consumed, "processing finished");
        Ok((self.consumed > 0).then_some(self.consumed))
    }

    /// Runs the loop to completion and drops the output.
    ///
    /// Useful when the transformers do their work through side effects.
    /// Returns the same count as [`process_to`](Processor::process_to).
    pub fn process(self) -> Result<Option<u64>> {
        self.process_to(Discard)
    }

    /// Runs the loop to completion and returns everything written.
    pub fn to_vec(self) -> Result<Vec<S::Unit>> {
        let mut out = Vec::new();
        self.process_to(&mut out)?;
        Ok(out)
    }

    /// Turns the processor into a lazily read stream of its output.
    pub fn into_stream(self) -> PullStream<S> {
        PullStream::new(self)
    }

    /// Reads one segment and threads it through the chain.
    ///
    /// Must not be called once [`is_finished`](Processor::is_finished) is true.
    pub(crate) fn step(&mut self) -> Result<Step<'_, S::Unit>> {
        let block = self.config.block_size();
        let want = match self.remaining {
            Some(left) => usize::try_from(left).map_or(block, |left| left.min(block)),
            None => block,
        };

        let segment = if want == 0 {
            Segment::end()
        } else {
            self.source.read(want)?
        };

        let read = segment.len() as u64;
        self.consumed += read;
        if let Some(left) = self.remaining.as_mut() {
            *left = left.saturating_sub(read);
        }
        self.finished = segment.end;
        tracing::trace!(%segment, consumed = self.consumed, "segment read");

        let output = self.chain.transform(Cow::Borrowed(segment.data), segment.end)?;
        Ok(Step {
            output,
            end: segment.end,
        })
    }

    /// Closes the source.
    pub(crate) fn close_source(&mut self) -> Result<()> {
        self.source.close()
    }
}

impl<S: ChunkSource<Unit = char>> Processor<S> {
    /// Runs the loop to completion and returns the output as a string.
    pub fn into_string(self) -> Result<String> {
        let mut out = String::new();
        self.process_to(&mut out)?;
        Ok(out)
    }

    /// Encodes the output with `encoder`, giving a byte source.
    ///
    /// The output is pulled lazily as the returned source is read.
    ///
    /// ```
    /// use segpipe::{PipeConfig, Processor, Utf8Encoder, source};
    ///
    /// let chars = Processor::new(source::from_str("né"), PipeConfig::new(1)?)?;
    /// let bytes = Processor::new(chars.into_encoder(Utf8Encoder::new()), PipeConfig::new(8)?)?;
    /// assert_eq!(bytes.to_vec()?, "né".as_bytes());
    /// # Ok::<(), segpipe::PipeError>(())
    /// ```
    pub fn into_encoder<C>(self, encoder: C) -> ReaderSource<CodecReader<PullStream<S>, C>>
    where
        C: Coder<Input = char, Output = u8>,
    {
        source::encode(self.into_stream(), encoder)
    }
}

impl<S: ChunkSource + fmt::Debug> fmt::Debug for Processor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("source", &self.source)
            .field("chain", &self.chain)
            .field("config", &self.config)
            .field("consumed", &self.consumed)
            .field("finished", &self.finished)
            .finish()
    }
}
