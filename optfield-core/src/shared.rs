use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, mutable value that fields can adopt by reference.
///
/// This is the only way to make a [`Field`](crate::Field) alias storage owned
/// elsewhere. Cloning the handle clones the reference, not the value: every
/// clone and every field adopted from it observe the same storage.
///
/// Lock poisoning is ignored. A panic while a guard is held leaves the value
/// in whatever state the panicking code left it.
pub struct Shared<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Shared<T> {
    /// Creates a new handle owning `value`.
    pub fn new(value: T) -> Self {
        Shared {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Locks the value for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the value for writing. Changes are visible to every adopting field.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the shared value.
    pub fn set(&self, value: T) {
        *self.write() = value;
    }

    /// Returns true if both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Shared<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.read().clone()
    }

    /// Consumes the handle, returning the value.
    ///
    /// Moves the value out if this is the last handle, clones it otherwise.
    pub fn into_value(self) -> T {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(inner) => inner.read().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shared").field(&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_clone_aliases() {
        let a = Shared::new(1);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn shared_distinct_handles() {
        let a = Shared::new(1);
        let b = Shared::new(1);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn shared_write_guard() {
        let s = Shared::new(vec![1, 2]);
        s.write().push(3);
        assert_eq!(*s.read(), vec![1, 2, 3]);
    }

    #[test]
    fn shared_into_value_last_handle() {
        let s = Shared::new("owned".to_string());
        assert_eq!(s.into_value(), "owned");
    }

    #[test]
    fn shared_into_value_with_other_handles() {
        let s = Shared::new("kept".to_string());
        let other = s.clone();
        assert_eq!(s.into_value(), "kept");
        assert_eq!(other.get(), "kept");
    }
}
