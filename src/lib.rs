//! segpipe
//!
//! Pull-based streaming transform pipelines for bytes and characters.
//!
//! `segpipe` reads a stream in segments, threads each segment through a chain
//! of stateful transformers and either writes the result to a destination or
//! hands it out lazily. It is designed as a small, composable primitive for:
//!
//! - block ciphers and other transforms that need aligned input
//! - decoding and encoding character streams incrementally
//! - bounded, read-limited copies between origins and destinations
//!
//! The crate intentionally:
//! - does NOT spawn threads or run async tasks
//! - does NOT own files or paths
//! - does NOT retry failed reads or writes
//!
//! It only does one thing: **read segments → transform → write or stream**
//!
//! # Pipeline
//!
//! ```
//! use segpipe::{Aligned, Identity, PipeConfig, Processor, source};
//!
//! let processor = Processor::new(source::from_slice(&b"abcde"[..]), PipeConfig::new(2)?)?
//!     .with_transformer(Aligned::fixed(Identity, 3)?);
//!
//! let mut out = Vec::new();
//! assert_eq!(processor.process_to(&mut out)?, Some(5));
//! assert_eq!(out, b"abcde");
//! # Ok::<(), segpipe::PipeError>(())
//! ```
//!
//! # Codecs
//!
//! ```
//! use segpipe::{PipeConfig, Processor, SliceReader, UnitRead, Utf8Decoder, source};
//!
//! let chars = source::decode(SliceReader::new("héllo".as_bytes()), Utf8Decoder::new());
//! let mut stream = Processor::new(chars, PipeConfig::new(1)?)?.into_stream();
//!
//! let mut text = String::new();
//! while let Some(c) = stream.read_one()? {
//!     text.push(c);
//! }
//! assert_eq!(text, "héllo");
//! # Ok::<(), segpipe::PipeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod source;
pub mod transform;

mod error;
mod processor;
mod read;
mod segment;
mod sink;

mod util; // internal (chunk merging)

//
// Public surface
//

pub use codec::{CodecReader, Coder, CoderResult, CoderStep, Utf8Decoder, Utf8Encoder};
pub use config::PipeConfig;
pub use error::{PipeError, Result};
pub use processor::{Processor, PullStream, Units};
pub use read::{IoReader, SeekReader, SliceReader, UnitRead, chars};
pub use segment::{Segment, Unit};
pub use sink::{Discard, IoSink, Sink, SliceSink};
pub use source::{ArraySource, ChunkSource, Limit, ReaderSource};
pub use transform::{
    Aligned, Alignment, Buffered, Chain, Identity, Transformed, Transformer, Window,
    WindowTransformer,
};

#[cfg(feature = "charset")]
pub use codec::{CharsetDecoder, CharsetEncoder};
