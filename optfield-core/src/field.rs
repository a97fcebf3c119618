use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::RwLockWriteGuard;

use crate::shared::Shared;

/// Rendering of an absent field in `Display` output.
pub const NONE_SENTINEL: &str = "<none>";

/// A value that may be present or absent.
///
/// Fields exist in two logical states:
/// - **Absent**: no value is stored
/// - **Present**: exactly one value is stored
///
/// Unlike `Option<T>` inside a serde struct, an absent field reports itself
/// through [`Field::is_zero`], so `skip_serializing_if` can omit it while a
/// present field holding `T::default()` is still written out.
///
/// When serialized, a present field emits just its value and an absent field
/// emits null. A null token always decodes as absent.
pub struct Field<T> {
    slot: Slot<T>,
}

#[derive(Clone)]
enum Slot<T> {
    Absent,
    Owned(T),
    /// Storage shared with a [`Shared`] handle held elsewhere.
    Adopted(Shared<T>),
}

impl<T> Field<T> {
    /// Creates an absent field.
    pub const fn empty() -> Self {
        Field { slot: Slot::Absent }
    }

    /// Creates a present field owning `value`.
    pub fn new(value: T) -> Self {
        Field {
            slot: Slot::Owned(value),
        }
    }

    /// Creates a present field that aliases the storage behind `shared`.
    ///
    /// No copy is made. Writes through `shared` (or any clone of it) are
    /// visible through this field, and writes through [`Field::reference`]
    /// are visible through `shared`. Clones of the returned field keep the
    /// alias. Calling [`Field::set`] or [`Field::clear`] detaches the field
    /// and leaves the shared value untouched.
    pub fn adopt(shared: &Shared<T>) -> Self {
        Field {
            slot: Slot::Adopted(shared.clone()),
        }
    }

    /// Returns true if a value is stored.
    pub fn is_present(&self) -> bool {
        !matches!(self.slot, Slot::Absent)
    }

    /// Returns true if no value is stored.
    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    /// Returns true if the field is absent.
    ///
    /// This is the hook for serde's `skip_serializing_if`: an absent field is
    /// omittable, a present one is not, whatever value it holds.
    pub fn is_zero(&self) -> bool {
        self.is_absent()
    }

    /// Returns true if the field aliases a [`Shared`] handle.
    pub fn is_adopted(&self) -> bool {
        matches!(self.slot, Slot::Adopted(_))
    }

    /// Stores `value`, making the field present.
    pub fn set(&mut self, value: T) {
        self.slot = Slot::Owned(value);
    }

    /// Discards any stored value, making the field absent.
    pub fn clear(&mut self) {
        self.slot = Slot::Absent;
    }

    /// Calls `f` with a reference to the value if present.
    ///
    /// For adopted fields `f` runs while the shared value is read-locked, so
    /// it must not write through the adopted handle.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        match &self.slot {
            Slot::Absent => None,
            Slot::Owned(value) => Some(f(value)),
            Slot::Adopted(shared) => Some(f(&*shared.read())),
        }
    }

    /// Returns a mutable reference to the stored value, if present.
    ///
    /// Writes through the returned guard change the field's value in place
    /// (and the shared value, for adopted fields).
    ///
    /// For adopted fields the guard holds the shared value's write lock until
    /// it is dropped. Reading or writing through the adopted handle, or
    /// through another field adopted from it, on the same thread while the
    /// guard lives deadlocks.
    pub fn reference(&mut self) -> Option<FieldMut<'_, T>> {
        match &mut self.slot {
            Slot::Absent => None,
            Slot::Owned(value) => Some(FieldMut(RefInner::Owned(value))),
            Slot::Adopted(shared) => Some(FieldMut(RefInner::Adopted(shared.write()))),
        }
    }
}

impl<T: Clone> Field<T> {
    /// Creates a field from an optional reference, cloning the referent.
    pub fn from_ptr(ptr: Option<&T>) -> Self {
        ptr.cloned().into()
    }

    /// Returns a copy of the value if present.
    pub fn get(&self) -> Option<T> {
        self.with_value(T::clone)
    }

    /// Returns a copy of the value, or `T::default()` if absent.
    pub fn get_or_default(&self) -> T
    where
        T: Default,
    {
        self.get().unwrap_or_default()
    }

    /// Returns a copy of the value.
    ///
    /// # Panics
    ///
    /// Panics if the field is absent. Use this only where absence is a bug.
    #[track_caller]
    pub fn must_get(&self) -> T {
        match self.get() {
            Some(value) => value,
            None => panic!("value not present"),
        }
    }

    /// Returns a freshly boxed copy of the value, never the internal storage.
    pub fn to_owned_ptr(&self) -> Option<Box<T>> {
        self.with_value(|value| Box::new(value.clone()))
    }

    /// Returns the value if present, otherwise `default`.
    pub fn or_else(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    /// Returns the value if present, otherwise the result of `supplier`.
    pub fn or_else_get(&self, supplier: impl FnOnce() -> T) -> T {
        self.get().unwrap_or_else(supplier)
    }

    /// Calls `action` with a copy of the value if present.
    pub fn if_present(&self, action: impl FnOnce(T)) {
        if let Some(value) = self.get() {
            action(value);
        }
    }

    /// Calls `action` with a copy of the value if present, otherwise `else_action`.
    pub fn if_present_or_else(&self, action: impl FnOnce(T), else_action: impl FnOnce()) {
        match self.get() {
            Some(value) => action(value),
            None => else_action(),
        }
    }

    /// Takes the value out, leaving the field absent.
    pub fn take(&mut self) -> Option<T> {
        std::mem::take(self).into_option()
    }

    /// Converts into an `Option`, moving the value out when it is owned.
    pub fn into_option(self) -> Option<T> {
        match self.slot {
            Slot::Absent => None,
            Slot::Owned(value) => Some(value),
            Slot::Adopted(shared) => Some(shared.into_value()),
        }
    }
}

/// A mutable reference to the value stored in a [`Field`].
pub struct FieldMut<'a, T>(RefInner<'a, T>);

enum RefInner<'a, T> {
    Owned(&'a mut T),
    Adopted(RwLockWriteGuard<'a, T>),
}

impl<T> Deref for FieldMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.0 {
            RefInner::Owned(value) => &**value,
            RefInner::Adopted(guard) => &**guard,
        }
    }
}

impl<T> DerefMut for FieldMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.0 {
            RefInner::Owned(value) => &mut **value,
            RefInner::Adopted(guard) => &mut **guard,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field {
            slot: self.slot.clone(),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::new(value),
            None => Field::empty(),
        }
    }
}

impl<T: Clone> From<Field<T>> for Option<T> {
    fn from(field: Field<T>) -> Option<T> {
        field.into_option()
    }
}

impl<T: PartialEq> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        if let (Slot::Adopted(a), Slot::Adopted(b)) = (&self.slot, &other.slot) {
            if a.ptr_eq(b) {
                return true;
            }
        }
        match self.with_value(|a| other.with_value(|b| a == b)) {
            None => other.is_absent(),
            Some(eq) => eq.unwrap_or(false),
        }
    }
}

impl<T: Eq> Eq for Field<T> {}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Absent => f.write_str("Absent"),
            Slot::Owned(value) => f.debug_tuple("Present").field(value).finish(),
            Slot::Adopted(shared) => f.debug_tuple("Adopted").field(&*shared.read()).finish(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Absent => f.write_str(NONE_SENTINEL),
            Slot::Owned(value) => fmt::Display::fmt(value, f),
            Slot::Adopted(shared) => fmt::Display::fmt(&*shared.read(), f),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Present values are written bare, with no presence envelope
        match &self.slot {
            Slot::Absent => serializer.serialize_none(),
            Slot::Owned(value) => value.serialize(serializer),
            Slot::Adopted(shared) => shared.read().serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Null is absent, even when T could hold a null of its own
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}
