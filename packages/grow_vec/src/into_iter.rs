use std::any::type_name;
use std::fmt;
use std::iter::FusedIterator;
use std::{ptr, slice};

use crate::{GrowVec, RawBuffer};

/// An iterator that moves the elements out of a [`GrowVec`].
///
/// Takes over the container's buffer, so no reallocation or copying happens. Elements that are
/// not consumed are dropped together with the iterator.
///
/// # Examples
///
/// ```
/// use grow_vec::GrowVec;
///
/// let items = GrowVec::from([String::from("a"), String::from("b")]);
///
/// let mut joined = String::new();
/// for item in items {
///     joined.push_str(&item);
/// }
///
/// assert_eq!(joined, "ab");
/// ```
pub struct IntoIter<T> {
    buffer: RawBuffer<T>,

    /// The live elements not yet yielded are the ones in `[start, end)`.
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements that have not been yielded yet.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        let remaining = self
            .end
            .checked_sub(self.start)
            .expect("start never passes end");

        // SAFETY: The slots in [start, end) are still initialized and owned by the iterator.
        unsafe { slice::from_raw_parts(self.buffer.slot(self.start).as_ptr(), remaining) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        let slot = self.buffer.slot(self.start);

        self.start = self
            .start
            .checked_add(1)
            .expect("start is below end, which fits in usize");

        // SAFETY: The slot was in the remaining range, which we just shrank, so the value is ours
        // to take and will not be read or dropped again.
        Some(unsafe { slot.read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .end
            .checked_sub(self.start)
            .expect("start never passes end");

        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        self.end = self
            .end
            .checked_sub(1)
            .expect("end is above start, so it is non-zero");

        // SAFETY: The slot was the last one in the remaining range, which we just shrank, so the
        // value is ours to take and will not be read or dropped again.
        Some(unsafe { self.buffer.slot(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self
            .end
            .checked_sub(self.start)
            .expect("start never passes end");
        let rest = ptr::slice_from_raw_parts_mut(self.buffer.slot(self.start).as_ptr(), remaining);

        // SAFETY: The slots in [start, end) are initialized and never yielded, so dropping them
        // here is their one and only drop. The buffer field releases the memory afterwards.
        unsafe {
            ptr::drop_in_place(rest);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(type_name::<Self>())
            .field(&self.as_slice())
            .finish()
    }
}

impl<T> IntoIterator for GrowVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (buffer, len) = self.into_raw_parts();

        IntoIter {
            buffer,
            start: 0,
            end: len,
        }
    }
}
