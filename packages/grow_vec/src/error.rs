use std::alloc::{Layout, LayoutError, handle_alloc_error};

use thiserror::Error;

/// Errors that can occur when obtaining storage for a [`GrowVec`][crate::GrowVec] or a
/// [`RawBuffer`][crate::RawBuffer].
///
/// Only the `try_*` methods return this type. Their infallible counterparts panic on capacity
/// problems and divert allocation failures to [`std::alloc::handle_alloc_error`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Doubling the current capacity to make room for another element would overflow `usize`.
    #[error("doubling capacity {capacity} overflows usize")]
    CapacityOverflow {
        /// The capacity that could not be doubled.
        capacity: usize,
    },

    /// The requested number of slots does not fit in a single allocation.
    #[error("a buffer of {capacity} slots exceeds the maximum allocation size")]
    LayoutTooLarge {
        /// The number of slots that was requested.
        capacity: usize,

        /// Why the memory layout could not be calculated.
        source: LayoutError,
    },

    /// The memory allocator could not satisfy the request.
    #[error("failed to allocate {} bytes aligned to {}", layout.size(), layout.align())]
    AllocationFailed {
        /// The layout of the allocation that failed.
        layout: Layout,
    },
}

/// A specialized `Result` type for storage operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Converts a storage result into its value for the infallible API surface.
///
/// Allocator failures go through the standard allocation error handler (which aborts by default)
/// and every other error becomes a panic, the same way the standard collections behave.
pub(crate) fn infallible<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::AllocationFailed { layout }) => handle_alloc_error(layout),
        Err(error) => panic!("{error}"),
    }
}
