//! Factory-enforced shared allocation for value payloads.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable heap payload.
///
/// The constructor is `pub(super)` so that every heap allocation goes
/// through a `Value` factory method; payloads never change after
/// construction, so sharing them between values is safe.
#[repr(transparent)]
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    /// Allocate a new payload. Only callable from the value module.
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        // Pointer equality short-circuits the deep comparison.
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}
