//! Injectable field slots.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// A field the container fills during autowiring.
///
/// The slot is written at most once, through a shared reference, so a
/// singleton already shared behind an `Arc` can still be wired. Reading
/// through `Deref` before the container wired the slot panics; use
/// [`get`](Inject::get) when that can legitimately happen.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::Inject;
///
/// let slot: Inject<str> = Inject::default();
/// assert!(!slot.is_wired());
/// assert!(slot.get().is_none());
/// ```
pub struct Inject<T: ?Sized> {
    slot: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    pub fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// The injected dependency, if wiring already happened.
    #[inline]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.slot.get()
    }

    #[inline]
    pub fn is_wired(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Stores `value` unless the slot is already filled; returns whether it was stored.
    pub(crate) fn fill(&self, value: Arc<T>) -> bool {
        self.slot.set(value).is_ok()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.slot.get().unwrap_or_else(|| {
            panic!(
                "Injected field of type {} read before autowiring",
                std::any::type_name::<T>()
            )
        })
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("wired", &self.is_wired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_once() {
        let slot: Inject<String> = Inject::new();
        let first = Arc::new("first".to_string());

        assert!(slot.fill(first.clone()));
        assert!(!slot.fill(Arc::new("second".to_string())));
        assert!(Arc::ptr_eq(slot.get().unwrap(), &first));
        assert_eq!(&*slot, "first");
    }

    #[test]
    #[should_panic(expected = "read before autowiring")]
    fn test_deref_before_wiring_panics() {
        let slot: Inject<String> = Inject::new();
        let _ = slot.len();
    }
}
