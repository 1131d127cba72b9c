use std::alloc::{Layout, alloc, dealloc};
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tracing::trace;

use crate::{Error, Result, infallible};

/// An owned, uninitialized memory region with room for a fixed number of `T`.
///
/// This is the backing storage of a [`GrowVec`][crate::GrowVec]. The buffer only knows how many
/// slots it has, not which of them hold live values. Tracking liveness, constructing values in
/// slots and dropping them again is the responsibility of whoever owns the buffer. Dropping the
/// buffer releases the memory without running any element destructor.
///
/// The buffer never creates references to its slots. It only hands out pointers, so all reads
/// and writes of slot contents happen in the owner's `unsafe` code, under the owner's knowledge
/// of which slots are initialized.
///
/// A buffer with zero capacity, or one holding zero-sized elements, does not allocate.
///
/// # Examples
///
/// ```
/// use grow_vec::RawBuffer;
///
/// let buffer = RawBuffer::<u64>::with_capacity(4);
/// assert_eq!(buffer.capacity(), 4);
///
/// // SAFETY: Slot 0 is inside the buffer and u64 has no drop logic to skip.
/// let value = unsafe {
///     buffer.slot(0).write(42);
///     buffer.slot(0).read()
/// };
/// assert_eq!(value, 42);
/// ```
pub struct RawBuffer<T> {
    /// Start of the region. Dangling (but aligned) when nothing was allocated.
    ptr: NonNull<T>,

    capacity: usize,

    // Slots may hold values of `T` on behalf of the owner.
    _owns: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    /// Creates an empty buffer with zero capacity. This does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Creates a buffer with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocation size. Allocation failure is
    /// reported through [`std::alloc::handle_alloc_error`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        infallible(Self::try_with_capacity(capacity))
    }

    /// Creates a buffer with room for exactly `capacity` elements, reporting failure as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayoutTooLarge`] if the buffer would exceed the maximum allocation size
    /// and [`Error::AllocationFailed`] if the memory allocator rejects the request.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Self::layout(capacity)?;

        if layout.size() == 0 {
            // Zero-sized elements need no memory, only the bookkeeping.
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        // SAFETY: The layout has a non-zero size, as checked above.
        let ptr = unsafe { alloc(layout) };

        let ptr = NonNull::new(ptr.cast::<T>()).ok_or(Error::AllocationFailed { layout })?;

        trace!(
            capacity,
            bytes = layout.size(),
            element_type = type_name::<T>(),
            "allocated buffer"
        );

        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    fn layout(capacity: usize) -> Result<Layout> {
        Layout::array::<T>(capacity).map_err(|source| Error::LayoutTooLarge { capacity, source })
    }

    /// The number of slots in the buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// Any index up to and including `capacity()` is accepted. The pointer for `capacity()` is the
    /// one-past-the-end address and must never be read from or written to.
    ///
    /// Obtaining the pointer is safe. Whether the slot holds an initialized value is up to the
    /// owner of the buffer to know.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than `capacity()`.
    #[must_use]
    pub fn slot(&self, index: usize) -> NonNull<T> {
        assert!(
            index <= self.capacity,
            "slot {index} out of bounds in buffer of {} slots of {}",
            self.capacity,
            type_name::<T>()
        );

        // SAFETY: The offset is at most one past the end of the allocation (guarded above), so it
        // stays within the same allocated object. For zero-sized T the offset is zero bytes.
        unsafe { self.ptr.add(index) }
    }

    /// Returns a pointer to the first slot.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Exchanges the memory regions of two buffers. Never allocates and never fails.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }

        let layout =
            Self::layout(self.capacity).expect("layout was valid when the buffer was allocated");

        if layout.size() == 0 {
            return;
        }

        // SAFETY: The region was allocated in `try_with_capacity()` with this same layout and has
        // not been released since, as every buffer releases its region exactly once, here.
        unsafe {
            dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// SAFETY: The buffer is a plain owned allocation. Moving it to another thread is as safe as
// moving the values it may hold on behalf of its owner.
unsafe impl<T: Send> Send for RawBuffer<T> {}

// SAFETY: A shared buffer only hands out pointers; any access through them is governed by the
// owner, which can only share values across threads if T itself is Sync.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}
