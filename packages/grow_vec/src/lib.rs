#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A contiguous growable sequence built directly on raw allocations.
//!
//! This crate provides [`GrowVec`], a generic container with amortized O(1) append and O(1)
//! random access that keeps reserved storage (capacity) separate from the number of live
//! elements (length). It does not build on `Vec` or any other growable array: memory comes from
//! the global allocator via [`RawBuffer`], and the container constructs, moves and drops elements
//! in that memory itself.
//!
//! # Key Features
//!
//! - **Two layers**: [`RawBuffer`] owns uninitialized slots and knows nothing about liveness,
//!   [`GrowVec`] owns one buffer plus the count of live elements at its start
//! - **Predictable growth**: a full container doubles its capacity (starting from 1), while
//!   [`reserve()`](GrowVec::reserve) and [`resize()`](GrowVec::resize) jump straight to the
//!   requested size
//! - **Documented panic safety**: each operation states whether a panicking element operation
//!   leaves the container unchanged or merely valid
//! - **Fallible allocation**: [`try_reserve()`](GrowVec::try_reserve) and friends report
//!   allocation problems as [`Error`] values instead of panicking
//! - **Flexible drop policies**: configure whether a non-empty container may be dropped
//! - **Thread mobility**: containers are [`Send`] and [`Sync`] whenever the element type is
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use grow_vec::GrowVec;
//!
//! let mut items = GrowVec::new();
//! items.push("a".to_string());
//! items.push("b".to_string());
//!
//! assert_eq!(items.len(), 2);
//! assert_eq!(items.capacity(), 2);
//! assert_eq!(items[1], "b");
//! ```
//!
//! ## Explicit capacity control
//!
//! ```rust
//! use grow_vec::GrowVec;
//!
//! let mut items = GrowVec::<u32>::with_len(3);
//! assert_eq!(items.capacity(), 3);
//!
//! // Reserving takes the total capacity, not an increment.
//! items.reserve(10);
//! assert_eq!(items.capacity(), 10);
//!
//! // Shrinking the length keeps the buffer.
//! items.resize(1);
//! assert_eq!(items.len(), 1);
//! assert_eq!(items.capacity(), 10);
//! ```
//!
//! ## Fallible allocation
//!
//! ```rust
//! use grow_vec::{Error, GrowVec};
//!
//! let mut items = GrowVec::from([1_u64, 2, 3]);
//!
//! let result = items.try_reserve(usize::MAX);
//! assert!(matches!(result, Err(Error::LayoutTooLarge { .. })));
//!
//! // A failed reservation leaves the container exactly as it was.
//! assert_eq!(items, [1, 2, 3]);
//! ```
//!
//! # Logging
//!
//! Buffer allocations and relocations are reported as `trace` level [`tracing`] events. The crate
//! never installs a subscriber.

mod builder;
mod container;
mod drop_policy;
mod error;
mod into_iter;
mod raw_buffer;

pub use builder::*;
pub use container::GrowVec;
pub use drop_policy::*;
pub use error::Error;
pub(crate) use error::{Result, infallible};
pub use into_iter::IntoIter;
pub use raw_buffer::RawBuffer;
