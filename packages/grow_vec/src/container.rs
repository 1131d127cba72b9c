use std::any::type_name;
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::{ptr, slice, thread};

use tracing::trace;

use crate::{DropPolicy, Error, GrowVecBuilder, RawBuffer, Result, infallible};

/// A contiguous growable sequence that manages its own storage.
///
/// Elements live in a single [`RawBuffer`]. The first [`len()`][Self::len] slots of the buffer
/// hold live elements and the remaining slots up to [`capacity()`][Self::capacity] are
/// uninitialized. Appending to a full container doubles the capacity (starting from 1), which
/// makes appends amortized O(1). Random access goes through the slice the container derefs to.
///
/// # Relocation
///
/// Growing moves every live element into a new buffer. A Rust move is a bitwise copy that cannot
/// fail, so relocation never runs user code and never needs `T: Clone`. The old slots are
/// forgotten, not dropped, because their values now live in the new buffer.
///
/// # Panic safety
///
/// If an element operation panics (a constructor closure, [`Clone`], [`Default`] or [`Drop`]),
/// the panic propagates and the container is left in the state documented for the operation:
///
/// * Growing appends and inserts, [`reserve()`][Self::reserve] and the reallocating branch of
///   [`clone_from()`][Clone::clone_from] give the strong guarantee: the container is unchanged.
/// * Interior inserts, [`erase()`][Self::erase] and the buffer-reusing branch of `clone_from()`
///   only guarantee that the container remains valid and safe to drop.
///
/// No element is ever dropped twice and no live element is leaked by these paths.
///
/// # Examples
///
/// ```
/// use grow_vec::GrowVec;
///
/// let mut items = GrowVec::new();
/// items.push(1);
/// items.push(2);
/// items.push(3);
///
/// items.insert(1, 9);
/// assert_eq!(items, [1, 9, 2, 3]);
///
/// items.erase(1);
/// assert_eq!(items, [1, 2, 3]);
///
/// assert_eq!(items.len(), 3);
/// assert_eq!(items.capacity(), 4);
/// ```
pub struct GrowVec<T> {
    buffer: RawBuffer<T>,

    /// Number of initialized slots at the start of `buffer`.
    len: usize,

    drop_policy: DropPolicy,
}

impl<T> GrowVec<T> {
    /// Creates an empty container. This does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::new(),
            len: 0,
            drop_policy: DropPolicy::MayDropItems,
        }
    }

    /// Starts configuring a new container.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::{DropPolicy, GrowVec};
    ///
    /// let items = GrowVec::<String>::builder()
    ///     .capacity(16)
    ///     .drop_policy(DropPolicy::MustNotDropItems)
    ///     .build();
    ///
    /// assert_eq!(items.capacity(), 16);
    /// ```
    #[inline]
    pub fn builder() -> GrowVecBuilder<T> {
        GrowVecBuilder::new()
    }

    /// Creates an empty container with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocation size.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Creates a container holding `len` default-constructed elements, with capacity `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let zeroes = GrowVec::<u8>::with_len(3);
    /// assert_eq!(zeroes, [0, 0, 0]);
    /// assert_eq!(zeroes.capacity(), 3);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut items = Self::with_capacity(len);
        items.resize_with(len, T::default);
        items
    }

    pub(crate) fn from_buffer(buffer: RawBuffer<T>, drop_policy: DropPolicy) -> Self {
        Self {
            buffer,
            len: 0,
            drop_policy,
        }
    }

    /// Takes the storage out of the container without dropping any elements.
    ///
    /// The caller becomes responsible for the first `len` slots of the returned buffer.
    pub(crate) fn into_raw_parts(self) -> (RawBuffer<T>, usize) {
        let mut this = ManuallyDrop::new(self);

        // What stays behind is an empty buffer, which owns no memory, so forgetting it is fine.
        (mem::take(&mut this.buffer), this.len)
    }

    /// The number of live elements.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no elements.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the container can hold without reallocating.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns a pointer to the first element.
    ///
    /// The pointer stays valid until the container reallocates or is dropped.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Returns a mutable pointer to the first element.
    ///
    /// The pointer stays valid until the container reallocates or is dropped.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    /// Views the live elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots are initialized and the pointer is non-null and aligned
        // even when nothing was allocated.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// Views the live elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The first `len` slots are initialized and the pointer is non-null and aligned
        // even when nothing was allocated. The exclusive borrow of self makes the slice unique.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// Ensures the capacity is at least `new_capacity`.
    ///
    /// Unlike [`Vec::reserve()`], the argument is the total capacity, not the number of
    /// additional elements. When the buffer is too small, a buffer of exactly `new_capacity`
    /// slots replaces it and all elements are moved over.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocation size. Allocation failure is
    /// reported through [`std::alloc::handle_alloc_error`].
    pub fn reserve(&mut self, new_capacity: usize) {
        infallible(self.try_reserve(new_capacity));
    }

    /// Ensures the capacity is at least `new_capacity`, reporting failure as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the new buffer cannot be allocated. The container is then unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.buffer.capacity() {
            return Ok(());
        }

        let new_buffer = RawBuffer::try_with_capacity(new_capacity)?;
        self.relocate_into(new_buffer, None);

        Ok(())
    }

    /// Appends an element.
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot grow any further.
    pub fn push(&mut self, value: T) {
        self.push_with(|| value);
    }

    /// Appends the element produced by `f` and returns a reference to it.
    ///
    /// When the container is full, the new buffer is allocated first and `f` is called after
    /// that, writing its result straight into the new buffer. If `f` panics, the container is
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let mut names = GrowVec::new();
    /// let name = names.push_with(|| String::from("first"));
    /// name.push_str(" entry");
    ///
    /// assert_eq!(names[0], "first entry");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot grow any further.
    pub fn push_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.insert_with(self.len, f);

        self.last_mut()
            .expect("we just appended an element so there is a last one")
    }

    /// Inserts `value` at `index`, shifting later elements back, and returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()` or if the capacity cannot grow any further.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.insert_with(index, || value)
    }

    /// Inserts the element produced by `f` at `index`, shifting later elements back, and returns
    /// `index`.
    ///
    /// # Panic safety
    ///
    /// If the container is full, it grows first and the strong guarantee applies: a panic in `f`
    /// leaves the container unchanged. Otherwise the documented guarantee is only that the
    /// container stays valid, though in practice `f` runs before any element is shifted.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()` or if the capacity cannot grow any further.
    pub fn insert_with<F>(&mut self, index: usize, f: F) -> usize
    where
        F: FnOnce() -> T,
    {
        assert!(
            index <= self.len,
            "insertion index {index} is past the end of GrowVec<{}> of length {}",
            type_name::<T>(),
            self.len
        );

        if self.len == self.buffer.capacity() {
            self.grow_and_insert(index, f);
        } else {
            let value = f();

            let shifted = self
                .len
                .checked_sub(index)
                .expect("guarded by assertion above");
            let slot = self.buffer.slot(index);
            let next = self.buffer.slot(
                index
                    .checked_add(1)
                    .expect("index is below capacity, which fits in usize"),
            );

            // SAFETY: [index, len) is initialized and [index + 1, len + 1) is in bounds because
            // len < capacity. The ranges overlap, which ptr::copy permits.
            unsafe {
                ptr::copy(slot.as_ptr(), next.as_ptr(), shifted);
            }

            // SAFETY: The value previously at `index` now also lives at `index + 1`, so the slot
            // is logically uninitialized and we may overwrite it without dropping anything.
            unsafe {
                slot.write(value);
            }

            self.len = self
                .len
                .checked_add(1)
                .expect("len is below capacity, which fits in usize");
        }

        index
    }

    fn grow_and_insert<F>(&mut self, index: usize, f: F)
    where
        F: FnOnce() -> T,
    {
        let new_buffer = RawBuffer::with_capacity(infallible(self.grown_capacity()));

        // If `f` panics, the new buffer is released during unwinding and self is untouched.
        let value = f();

        // SAFETY: index <= len < new capacity, and the new buffer has no live values yet.
        unsafe {
            new_buffer.slot(index).write(value);
        }

        self.relocate_into(new_buffer, Some(index));

        self.len = self
            .len
            .checked_add(1)
            .expect("len is below the new capacity, which fits in usize");
    }

    fn grown_capacity(&self) -> Result<usize> {
        let capacity = self.buffer.capacity();

        if capacity == 0 {
            return Ok(1);
        }

        capacity
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow { capacity })
    }

    /// Moves all live elements into `new_buffer` and makes it the active buffer.
    ///
    /// With a `gap`, the elements from that position onward land one slot later. The caller must
    /// have already initialized the gap slot in `new_buffer`.
    fn relocate_into(&mut self, mut new_buffer: RawBuffer<T>, gap: Option<usize>) {
        let split = gap.unwrap_or(self.len);
        let tail_len = self
            .len
            .checked_sub(split)
            .expect("the gap is never past the end");
        let tail_target = if gap.is_some() {
            split
                .checked_add(1)
                .expect("the gap is below the new capacity, which fits in usize")
        } else {
            split
        };

        // SAFETY: [0, split) and [split, len) are initialized in the old buffer and the target
        // ranges fit in the new buffer, which was sized for every element plus the gap.
        unsafe {
            Self::relocate(&self.buffer, 0, &new_buffer, 0, split);
        }

        // SAFETY: As above.
        unsafe {
            Self::relocate(&self.buffer, split, &new_buffer, tail_target, tail_len);
        }

        trace!(
            old_capacity = self.buffer.capacity(),
            new_capacity = new_buffer.capacity(),
            relocated = self.len,
            element_type = type_name::<T>(),
            "relocated elements into a new buffer"
        );

        // The old slots were moved out of, so only their memory is left to release, which
        // happens when `new_buffer` (now holding the old region) goes out of scope.
        self.buffer.swap(&mut new_buffer);
    }

    /// Moves `count` elements from slots starting at `from` in `source` to slots starting at
    /// `to` in `target`.
    ///
    /// # Safety
    ///
    /// The source slots must be initialized and the target slots must not hold live values.
    /// Afterwards the values live in the target slots and the source slots count as
    /// uninitialized.
    unsafe fn relocate(
        source: &RawBuffer<T>,
        from: usize,
        target: &RawBuffer<T>,
        to: usize,
        count: usize,
    ) {
        // Bounds check both ranges; slot() asserts on the one-past-the-end indexes.
        _ = source.slot(from.checked_add(count).expect("range end fits in usize"));
        _ = target.slot(to.checked_add(count).expect("range end fits in usize"));

        // SAFETY: Both ranges are in bounds (checked above) and belong to distinct allocations,
        // so they cannot overlap. Initialization is the caller's responsibility.
        unsafe {
            ptr::copy_nonoverlapping(source.slot(from).as_ptr(), target.slot(to).as_ptr(), count);
        }
    }

    /// Removes the element at `index`, shifting later elements forward, and returns `index`,
    /// which is now the position of the element that followed the removed one.
    ///
    /// Never reallocates.
    ///
    /// # Panic safety
    ///
    /// The element is dropped after the container has been made consistent again, so a panic in
    /// its destructor leaves a valid container without the element.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Removes and returns the element at `index`, shifting later elements forward.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {index} out of bounds in GrowVec<{}> of length {}",
            type_name::<T>(),
            self.len
        );

        let new_len = self
            .len
            .checked_sub(1)
            .expect("guarded by assertion above");
        let shifted = new_len
            .checked_sub(index)
            .expect("guarded by assertion above");
        let slot = self.buffer.slot(index);
        let next = self.buffer.slot(
            index
                .checked_add(1)
                .expect("index is below len, which fits in usize"),
        );

        // SAFETY: index < len so the slot is initialized. Reading takes ownership of the value;
        // the slot is overwritten by the shift below or falls outside the live range.
        let value = unsafe { slot.read() };

        // SAFETY: [index + 1, len) is initialized and the destination is in bounds. The ranges
        // overlap, which ptr::copy permits.
        unsafe {
            ptr::copy(next.as_ptr(), slot.as_ptr(), shifted);
        }

        self.len = new_len;

        value
    }

    /// Removes and returns the last element, or `None` if the container is empty.
    pub fn pop(&mut self) -> Option<T> {
        let new_len = self.len.checked_sub(1)?;
        self.len = new_len;

        // SAFETY: The slot was the last live one. Shrinking `len` first transfers ownership of the
        // value to us, so it will not be dropped again by the container.
        Some(unsafe { self.buffer.slot(new_len).read() })
    }

    /// Drops every element past the first `new_len`. Does nothing if `new_len >= len()`.
    ///
    /// The capacity and the addresses of the remaining elements are unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        let Some(removed) = self.len.checked_sub(new_len) else {
            return;
        };

        let tail = ptr::slice_from_raw_parts_mut(self.buffer.slot(new_len).as_ptr(), removed);

        // Shorten first so a panicking destructor cannot cause any element to be dropped twice.
        self.len = new_len;

        // SAFETY: The tail was initialized and is now outside the live range, so it is ours to
        // drop, exactly once.
        unsafe {
            ptr::drop_in_place(tail);
        }
    }

    /// Drops all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the container to `new_len`, filling new slots with [`Default::default()`].
    ///
    /// See [`resize_with()`][Self::resize_with] for details.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resizes the container to `new_len`, filling new slots with values produced by `f`.
    ///
    /// Shrinking drops the trailing elements without reallocating. Growing first reserves
    /// exactly `new_len` slots (no doubling) and then constructs the new elements in order.
    ///
    /// # Panic safety
    ///
    /// If `f` panics while growing, the container keeps the elements constructed so far.
    ///
    /// # Panics
    ///
    /// Panics if the buffer would exceed the maximum allocation size.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len);

        while self.len < new_len {
            let value = f();

            // SAFETY: len < new_len <= capacity and slots past len are uninitialized.
            unsafe {
                self.buffer.slot(self.len).write(value);
            }

            self.len = self
                .len
                .checked_add(1)
                .expect("len is below capacity, which fits in usize");
        }
    }

    /// Exchanges the contents of two containers. Never allocates and never fails.
    ///
    /// Each container keeps its own [`DropPolicy`].
    pub fn swap_with(&mut self, other: &mut Self) {
        self.buffer.swap(&mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        let was_empty = self.is_empty();

        // SAFETY: The live range is initialized and this is the last access to it.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
        }

        // The buffer field releases the memory after this.

        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if self.drop_policy == DropPolicy::MustNotDropItems && !thread::panicking() {
            assert!(
                was_empty,
                "dropped a non-empty GrowVec<{}> with a policy that says it must be empty when dropped",
                type_name::<T>()
            );
        }
    }
}

impl<T: Clone> Clone for GrowVec<T> {
    /// Creates an independent copy with capacity equal to the source's length.
    fn clone(&self) -> Self {
        let mut copy = Self::builder()
            .capacity(self.len)
            .drop_policy(self.drop_policy)
            .build();

        for item in self {
            copy.push(item.clone());
        }

        copy
    }

    /// Replaces the contents with a copy of `source`, reusing the buffer when it is big enough.
    ///
    /// # Panic safety
    ///
    /// When `source` does not fit in the current capacity, the copy is built in a fresh buffer
    /// before anything is touched, so a panicking clone leaves `self` unchanged. When the buffer
    /// is reused, a panicking clone leaves a valid container that may be partially overwritten.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap_with(&mut copy);

            // The previous elements are dropped here, regardless of either drop policy.
            copy.clear();
            return;
        }

        let shared = self.len.min(source.len);

        for (target, item) in self.iter_mut().zip(source) {
            target.clone_from(item);
        }

        self.truncate(source.len);

        for item in source.iter().skip(shared) {
            self.push(item.clone());
        }
    }
}

impl<T> Deref for GrowVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for GrowVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for GrowVec<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowVec<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq<GrowVec<U>> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &GrowVec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<[U]> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq> Eq for GrowVec<T> {}

impl<T> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items = Self::new();
        items.extend(iter);
        items
    }
}

impl<T, const N: usize> From<[T; N]> for GrowVec<T> {
    fn from(array: [T; N]) -> Self {
        let mut items = Self::with_capacity(N);
        items.extend(array);
        items
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(GrowVec<u32>: Send, Sync, fmt::Debug, Default, Clone);
    assert_not_impl_any!(GrowVec<Rc<u32>>: Send, Sync);
    assert_not_impl_any!(GrowVec<Cell<u32>>: Sync);

    /// Increments a shared counter when dropped.
    #[derive(Debug)]
    struct Droppable {
        drops: Rc<Cell<usize>>,
    }

    impl Droppable {
        fn new(drops: &Rc<Cell<usize>>) -> Self {
            Self {
                drops: Rc::clone(drops),
            }
        }
    }

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn smoke_test() {
        let mut items = GrowVec::new();

        items.push(42);
        items.push(43);
        items.push(44);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0], 42);
        assert_eq!(items[1], 43);
        assert_eq!(items[2], 44);

        assert_eq!(items.pop(), Some(44));
        assert_eq!(items, [42, 43]);
    }

    #[test]
    fn new_does_not_allocate() {
        let items = GrowVec::<u64>::new();

        assert_eq!(items.len(), 0);
        assert_eq!(items.capacity(), 0);
        assert!(items.is_empty());
    }

    #[test]
    fn growth_doubles_capacity() {
        let mut items = GrowVec::new();
        let mut observed = Vec::new();

        for value in 0..9 {
            items.push(value);
            observed.push(items.capacity());
        }

        assert_eq!(observed, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn growth_starts_from_reserved_capacity() {
        let mut items = GrowVec::with_capacity(3);

        items.extend([1, 2, 3]);
        assert_eq!(items.capacity(), 3);

        items.push(4);
        assert_eq!(items.capacity(), 6);
        assert_eq!(items, [1, 2, 3, 4]);
    }

    #[test]
    fn with_len_default_constructs() {
        let items = GrowVec::<String>::with_len(3);

        assert_eq!(items.len(), 3);
        assert_eq!(items.capacity(), 3);
        assert!(items.iter().all(String::is_empty));
    }

    #[test]
    fn push_with_returns_new_element() {
        let mut items = GrowVec::new();

        *items.push_with(|| 5) += 1;

        assert_eq!(items, [6]);
    }

    #[test]
    fn insert_in_middle() {
        let mut items = GrowVec::from([1, 2, 3]);
        items.reserve(8);

        let position = items.insert(1, 9);

        assert_eq!(position, 1);
        assert_eq!(items, [1, 9, 2, 3]);
        assert_eq!(items.capacity(), 8);
    }

    #[test]
    fn insert_in_middle_when_full_grows() {
        let mut items = GrowVec::from([1, 2, 3]);
        assert_eq!(items.capacity(), 3);

        let position = items.insert(1, 9);

        assert_eq!(position, 1);
        assert_eq!(items, [1, 9, 2, 3]);
        assert_eq!(items.capacity(), 6);
    }

    #[test]
    fn insert_at_both_ends() {
        let mut items = GrowVec::from([2, 3]);

        assert_eq!(items.insert(0, 1), 0);
        assert_eq!(items.insert(3, 4), 3);

        assert_eq!(items, [1, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn insert_past_end_panics() {
        let mut items = GrowVec::from([1, 2, 3]);

        items.insert(4, 9);
    }

    #[test]
    fn erase_returns_following_position() {
        let mut items = GrowVec::from([1, 9, 2, 3]);
        let capacity = items.capacity();

        let position = items.erase(1);

        assert_eq!(position, 1);
        assert_eq!(items[position], 2);
        assert_eq!(items, [1, 2, 3]);
        assert_eq!(items.capacity(), capacity);
    }

    #[test]
    fn erase_last_returns_end() {
        let mut items = GrowVec::from([1, 2, 3]);

        assert_eq!(items.erase(2), 2);
        assert_eq!(items.len(), 2);
    }

    #[test]
    #[should_panic]
    fn erase_out_of_bounds_panics() {
        let mut items = GrowVec::from([1, 2, 3]);

        items.erase(3);
    }

    #[test]
    fn remove_returns_element() {
        let mut items = GrowVec::from([String::from("a"), String::from("b")]);

        assert_eq!(items.remove(0), "a");
        assert_eq!(items, [String::from("b")]);
    }

    #[test]
    fn erase_drops_exactly_one_element() {
        let drops = Rc::new(Cell::new(0));
        let mut items = GrowVec::new();

        for _ in 0..4 {
            items.push(Droppable::new(&drops));
        }

        items.erase(1);
        assert_eq!(drops.get(), 1);

        drop(items);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut items = GrowVec::<u32>::new();

        assert_eq!(items.pop(), None);
        assert_eq!(items.len(), 0);
    }

    #[test]
    fn resize_up_appends_defaults() {
        let mut items = GrowVec::from([1, 2, 3]);

        items.resize(5);

        assert_eq!(items, [1, 2, 3, 0, 0]);
        assert_eq!(items.capacity(), 5);
    }

    #[test]
    fn resize_down_keeps_buffer() {
        let mut items = GrowVec::from([1, 2, 3]);
        let capacity = items.capacity();
        let first = items.as_ptr();

        items.resize(1);

        assert_eq!(items, [1]);
        assert_eq!(items.capacity(), capacity);
        assert_eq!(items.as_ptr(), first);
    }

    #[test]
    fn resize_to_same_len_is_noop() {
        let mut items = GrowVec::from([1, 2, 3]);
        let first = items.as_ptr();

        items.resize(3);

        assert_eq!(items, [1, 2, 3]);
        assert_eq!(items.as_ptr(), first);
    }

    #[test]
    fn resize_with_uses_producer() {
        let mut items = GrowVec::<usize>::new();
        let mut next = 0;

        items.resize_with(4, || {
            next += 10;
            next
        });

        assert_eq!(items, [10, 20, 30, 40]);
    }

    #[test]
    fn truncate_drops_tail() {
        let drops = Rc::new(Cell::new(0));
        let mut items = GrowVec::new();

        for _ in 0..5 {
            items.push(Droppable::new(&drops));
        }

        items.truncate(2);
        assert_eq!(drops.get(), 3);
        assert_eq!(items.len(), 2);

        items.truncate(10);
        assert_eq!(drops.get(), 3);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut items = GrowVec::from([1, 2, 3]);

        items.clear();

        assert!(items.is_empty());
        assert_eq!(items.capacity(), 3);
    }

    #[test]
    fn reserve_is_exact() {
        let mut items = GrowVec::from([1, 2]);

        items.reserve(13);

        assert_eq!(items.capacity(), 13);
        assert_eq!(items, [1, 2]);
    }

    #[test]
    fn reserve_smaller_is_noop() {
        let mut items = GrowVec::<u32>::with_capacity(8);
        let first = items.as_ptr();

        items.reserve(4);

        assert_eq!(items.capacity(), 8);
        assert_eq!(items.as_ptr(), first);
    }

    #[test]
    fn try_reserve_too_large_leaves_container_unchanged() {
        let mut items = GrowVec::from([1_u64, 2, 3]);
        let first = items.as_ptr();

        let result = items.try_reserve(usize::MAX);

        assert!(matches!(result, Err(Error::LayoutTooLarge { .. })));
        assert_eq!(items, [1, 2, 3]);
        assert_eq!(items.capacity(), 3);
        assert_eq!(items.as_ptr(), first);
    }

    #[test]
    fn relocation_does_not_drop_elements() {
        let drops = Rc::new(Cell::new(0));
        let mut items = GrowVec::new();

        for _ in 0..17 {
            items.push(Droppable::new(&drops));
        }

        items.reserve(100);
        assert_eq!(drops.get(), 0);

        drop(items);
        assert_eq!(drops.get(), 17);
    }

    #[test]
    fn clone_is_independent() {
        let original = GrowVec::from([String::from("a"), String::from("b")]);
        let mut copy = original.clone();

        assert_eq!(copy, original);
        assert_eq!(copy.capacity(), original.len());

        copy[0].push('!');
        copy.push(String::from("c"));

        assert_eq!(original, [String::from("a"), String::from("b")]);
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn clone_from_equal_len_reuses_buffer() {
        let source = GrowVec::from([1, 2, 3]);
        let mut target = GrowVec::from([7, 8, 9]);
        let first = target.as_ptr();

        target.clone_from(&source);

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.capacity(), 3);
        assert_eq!(target.as_ptr(), first);
    }

    #[test]
    fn clone_from_shorter_source_truncates() {
        let source = GrowVec::from([Rc::new(1)]);
        let mut target = GrowVec::from([Rc::new(5), Rc::new(6), Rc::new(7)]);
        let first = target.as_ptr();

        target.clone_from(&source);

        assert_eq!(target.len(), 1);
        assert_eq!(*target[0], 1);
        assert_eq!(target.capacity(), 3);
        assert_eq!(target.as_ptr(), first);
        assert_eq!(Rc::strong_count(&source[0]), 2);
    }

    #[test]
    fn clone_from_longer_source_within_capacity_appends() {
        let source = GrowVec::from([1, 2, 3, 4]);
        let mut target = GrowVec::with_capacity(8);
        target.push(9);
        let first = target.as_ptr();

        target.clone_from(&source);

        assert_eq!(target, [1, 2, 3, 4]);
        assert_eq!(target.capacity(), 8);
        assert_eq!(target.as_ptr(), first);
    }

    #[test]
    fn clone_from_larger_source_reallocates() {
        let source = GrowVec::from([Rc::new(1), Rc::new(2), Rc::new(3)]);
        let old = Rc::new(9);
        let mut target = GrowVec::from([Rc::clone(&old)]);

        target.clone_from(&source);

        assert_eq!(target.len(), 3);
        assert_eq!(target.capacity(), 3);
        assert_eq!(*target[2], 3);
        assert_eq!(Rc::strong_count(&old), 1);
    }

    #[test]
    fn take_leaves_empty_source() {
        let mut source = GrowVec::from([1, 2, 3]);
        let first = source.as_ptr();

        let target = mem::take(&mut source);

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.as_ptr(), first);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn swap_with_exchanges_contents() {
        let mut a = GrowVec::from([1, 2, 3]);
        let mut b = GrowVec::with_capacity(10);
        b.push(4);

        a.swap_with(&mut b);

        assert_eq!(a, [4]);
        assert_eq!(a.capacity(), 10);
        assert_eq!(b, [1, 2, 3]);
        assert_eq!(b.capacity(), 3);
    }

    #[test]
    fn iteration_visits_live_range_in_order() {
        let mut items = GrowVec::from([1, 2, 3]);
        items.reserve(10);

        for item in &mut items {
            *item *= 2;
        }

        let collected: Vec<_> = items.iter().copied().collect();
        assert_eq!(collected, [2, 4, 6]);
    }

    #[test]
    fn from_iterator_collects() {
        let items: GrowVec<_> = (1..=5).collect();

        assert_eq!(items, [1, 2, 3, 4, 5]);
        assert_eq!(items.capacity(), 8);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let items = GrowVec::from([1, 2, 3]);

        assert_eq!(items[3], 0);
    }

    #[test]
    fn zero_sized_elements_track_len_and_capacity() {
        let mut items = GrowVec::new();

        for _ in 0..5 {
            items.push(());
        }

        assert_eq!(items.len(), 5);
        assert_eq!(items.capacity(), 8);

        items.insert(2, ());
        items.erase(0);

        assert_eq!(items.len(), 5);
        assert_eq!(items.pop(), Some(()));
    }

    #[test]
    #[should_panic]
    fn drop_item_with_forbidden_to_drop_policy_panics() {
        let mut items = GrowVec::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();
        items.push(123);
    }

    #[test]
    fn drop_itemless_with_forbidden_to_drop_policy_ok() {
        let mut items = GrowVec::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();
        items.push(123);
        items.clear();
    }

    #[test]
    fn clone_from_reallocating_ignores_drop_policy_of_old_contents() {
        let source = GrowVec::from([1, 2, 3]);
        let mut target = GrowVec::builder()
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();
        target.push(9);

        target.clone_from(&source);
        assert_eq!(target, [1, 2, 3]);

        target.clear();
    }

    #[test]
    fn into_raw_parts_keeps_elements_alive() {
        let drops = Rc::new(Cell::new(0));
        let mut items = GrowVec::new();
        items.push(Droppable::new(&drops));
        items.push(Droppable::new(&drops));

        let (buffer, len) = items.into_raw_parts();
        assert_eq!(len, 2);
        assert_eq!(drops.get(), 0);

        for index in 0..len {
            // SAFETY: The first `len` slots were live when we took the buffer.
            unsafe {
                ptr::drop_in_place(buffer.slot(index).as_ptr());
            }
        }

        assert_eq!(drops.get(), 2);
    }
}
