//! The read → transform → write loop.
//!
//! - [`Processor`] - Drives a [`ChunkSource`](crate::ChunkSource) through a transformer chain
//! - [`PullStream`] - Reads a processor's output lazily, one step at a time

mod engine;
mod pull;

pub use engine::Processor;
pub use pull::{PullStream, Units};
