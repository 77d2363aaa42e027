//! Segment types.
//!
//! - [`Segment`] - One chunk of data plus an end-of-stream flag
//! - [`Unit`] - Element type of a pipeline (`u8` or `char`)

mod data;
mod unit;

pub use data::Segment;
pub use unit::Unit;
