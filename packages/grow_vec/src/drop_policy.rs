/// Determines element dropping behavior when a [`GrowVec`][crate::GrowVec] is dropped.
///
/// By default, the container will drop its elements when it is dropped.
///
/// # Examples
///
/// ```
/// use grow_vec::{DropPolicy, GrowVec};
///
/// // The drop policy is set at container creation time.
/// let items = GrowVec::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The container will drop its elements when the container is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The container will panic if it still contains elements when it is dropped.
    ///
    /// This may be valuable when unsafe code holds pointers obtained from
    /// [`as_ptr()`][crate::GrowVec::as_ptr] and the owner must explicitly empty the container
    /// (via [`clear()`][crate::GrowVec::clear], [`pop()`][crate::GrowVec::pop] and friends) once
    /// those pointers are no longer in use.
    MustNotDropItems,
}
