//! Error types for the flat view.

use thiserror::Error;

/// Errors returned by [`TreeFlattener`](crate::TreeFlattener) reads and by
/// the write half of the [`ListView`](crate::ListView) contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// Indexed read outside `[0, len)`.
    #[error("index {index} out of range for flat view of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The view length at the time of the read.
        len: usize,
    },

    /// Structural mutation attempted through the read-only projection.
    #[error("'{0}' is not supported on a read-only tree projection")]
    Unsupported(&'static str),

    /// Destination buffer cannot hold the copied nodes.
    #[error("buffer too small: need {needed} slots, {available} available")]
    BufferTooSmall {
        /// Slots required from the offset onward.
        needed: usize,
        /// Slots available from the offset onward.
        available: usize,
    },
}
