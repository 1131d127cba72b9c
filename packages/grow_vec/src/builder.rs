use std::cell::Cell;
use std::marker::PhantomData;

use crate::{DropPolicy, GrowVec, RawBuffer, Result, infallible};

/// Builder for creating an instance of [`GrowVec`].
///
/// All settings are optional. Without any, the builder produces the same empty, unallocated
/// container as [`GrowVec::new()`].
///
/// # Examples
///
/// ```
/// use grow_vec::{DropPolicy, GrowVec};
///
/// let items = GrowVec::<u64>::builder()
///     .capacity(32)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
///
/// assert_eq!(items.capacity(), 32);
/// assert!(items.is_empty());
/// ```
///
/// # Thread safety
///
/// The builder is thread-mobile ([`Send`]) and can be safely transferred between threads,
/// allowing container configuration to happen on different threads than where the container is
/// used. However, it is not thread-safe ([`Sync`]) as it contains mutable configuration state.
#[derive(Debug)]
#[must_use]
pub struct GrowVecBuilder<T> {
    capacity: usize,
    drop_policy: DropPolicy,

    _item: PhantomData<fn() -> T>,

    // Prevents Sync while allowing Send - builders are thread-mobile but not thread-safe
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> GrowVecBuilder<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
            _not_sync: PhantomData,
        }
    }

    /// Sets the number of elements the container can hold before its first reallocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let items = GrowVec::<u8>::builder().capacity(100).build();
    /// assert_eq!(items.capacity(), 100);
    /// ```
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the container. This governs how
    /// to treat remaining elements when the container is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::{DropPolicy, GrowVec};
    ///
    /// let mut items = GrowVec::builder()
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    ///
    /// items.push(1);
    ///
    /// // The container must be emptied explicitly before it is dropped.
    /// items.clear();
    /// ```
    #[inline]
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the container with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds the maximum allocation size. Allocation failure
    /// is reported through [`std::alloc::handle_alloc_error`].
    #[must_use]
    #[inline]
    pub fn build(self) -> GrowVec<T> {
        infallible(self.try_build())
    }

    /// Builds the container with the specified configuration, reporting failure to allocate the
    /// initial capacity as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer for the requested capacity cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::{Error, GrowVec};
    ///
    /// let result = GrowVec::<u64>::builder().capacity(usize::MAX).try_build();
    /// assert!(matches!(result, Err(Error::LayoutTooLarge { .. })));
    /// ```
    pub fn try_build(self) -> Result<GrowVec<T>> {
        let buffer = RawBuffer::try_with_capacity(self.capacity)?;

        Ok(GrowVec::from_buffer(buffer, self.drop_policy))
    }
}
