//! Internal utility functions and helpers.
//!
//! This module contains small helpers used throughout the crate.
//! It is an implementation detail and not part of the public API.

use std::borrow::Cow;

use crate::segment::Unit;
use crate::transform::Transformed;

/// Concatenates slices into one owned buffer.
pub(crate) fn concat<T: Unit>(parts: &[Cow<'_, [T]>]) -> Vec<T> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut combined = Vec::with_capacity(total);
    for part in parts {
        combined.extend_from_slice(part);
    }
    combined
}

/// Collects the results of several wrapped-transformer calls in order.
///
/// Empty and pending results are dropped. A single surviving result is
/// passed through untouched; several are copied into one buffer. A merge
/// with no data left is pending.
pub(crate) struct Merge<'a, T: Unit> {
    parts: Vec<Cow<'a, [T]>>,
    calls: usize,
}

impl<'a, T: Unit> Merge<'a, T> {
    pub(crate) fn new() -> Self {
        Self {
            parts: Vec::new(),
            calls: 0,
        }
    }

    pub(crate) fn push(&mut self, result: Transformed<'a, T>) {
        self.calls += 1;
        if let Transformed::Emit(data) = result {
            if !data.is_empty() {
                self.parts.push(data);
            }
        }
    }

    /// Returns true if no result has been pushed yet.
    pub(crate) fn is_empty(&self) -> bool {
        self.calls == 0
    }

    pub(crate) fn finish(mut self) -> Transformed<'a, T> {
        match self.parts.len() {
            0 => Transformed::Pending,
            1 => Transformed::Emit(self.parts.remove(0)),
            _ => Transformed::Emit(Cow::Owned(concat(&self.parts))),
        }
    }
}
