//! Error types for buffer construction and bounds-checked access.

use std::collections::TryReserveError;
use thiserror::Error;

/// Error returned when the backing storage for a buffer cannot be created.
///
/// A buffer size is a `usize`, so "negative size" is unrepresentable and the
/// only way construction itself can fail is the allocator refusing the
/// request. Initializer errors are a separate concern and travel through
/// [`FrozenBuf::try_new`](crate::FrozenBuf::try_new) unchanged.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The allocator could not provide `size` bytes.
    #[error("failed to allocate {size} byte buffer: {source}")]
    Alloc {
        /// Requested size in bytes.
        size: usize,

        /// The allocator failure reported by the standard library.
        #[source]
        source: TryReserveError,
    },
}

/// Error returned by reads and writes whose arguments fall outside the
/// buffer.
///
/// Reads never mutate, so this is the only way they can fail. Writes on a
/// [`Builder`](crate::Builder) share the same bounds semantics because both
/// sides delegate to the same storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    /// The byte range `[offset, offset + len)` does not fit in the storage.
    #[error("range [{offset}, {offset}+{len}) out of bounds for buffer of {size} bytes")]
    OutOfBounds {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range in bytes.
        len: usize,
        /// Total buffer size in bytes.
        size: usize,
    },

    /// A variable-width operation was given a width outside `1..=8`.
    #[error("invalid byte width {width}, expected 1..=8")]
    InvalidWidth {
        /// The rejected width.
        width: usize,
    },

    /// A variable-width write was given a value that does not fit in the
    /// requested width.
    #[error("value does not fit in {width} bytes")]
    ValueTooLarge {
        /// Width the value was supposed to fit in.
        width: usize,
    },

    /// A byte-swap was requested on a buffer whose length is not a multiple
    /// of the element width.
    #[error("buffer length {len} is not a multiple of {width} bytes")]
    UnalignedLength {
        /// Buffer length in bytes.
        len: usize,
        /// Required element width.
        width: usize,
    },
}

/// Bounds-checks `[offset, offset + len)` against a buffer of `size` bytes.
pub(crate) fn check_range(offset: usize, len: usize, size: usize) -> Result<(), BoundsError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(BoundsError::OutOfBounds { offset, len, size }),
    }
}

/// Validates a variable-width byte count.
pub(crate) fn check_width(width: usize) -> Result<(), BoundsError> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(BoundsError::InvalidWidth { width })
    }
}
