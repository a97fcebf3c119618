//! Transformations that may change the contained type.
//!
//! These are free functions rather than methods so that `T` and `U` are both
//! parameters of the call. None of them fail on their own; a panic in the
//! supplied closure propagates unchanged.

use crate::field::Field;

/// Applies `f` to the value if present.
pub fn map<T: Clone, U>(field: Field<T>, f: impl FnOnce(T) -> U) -> Field<U> {
    match field.into_option() {
        Some(value) => Field::new(f(value)),
        None => Field::empty(),
    }
}

/// Applies `f` to the value if present, letting `f` decide presence of the result.
pub fn flat_map<T: Clone, U>(field: Field<T>, f: impl FnOnce(T) -> Field<U>) -> Field<U> {
    match field.into_option() {
        Some(value) => f(value),
        None => Field::empty(),
    }
}

/// Keeps the field only if `predicate` holds for its value.
///
/// A kept field is returned as is, so an adopted field stays adopted.
pub fn filter<T>(field: Field<T>, predicate: impl FnOnce(&T) -> bool) -> Field<T> {
    if field.with_value(predicate).unwrap_or(false) {
        field
    } else {
        Field::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Shared;
    use std::cell::Cell;

    #[test]
    fn map_present() {
        let g = map(Field::new(10), |v| v + 1);
        assert_eq!(g.get(), Some(11));
    }

    #[test]
    fn map_changes_type() {
        let g = map(Field::new(7), |v: i32| v.to_string());
        assert_eq!(g.get(), Some("7".to_string()));
    }

    #[test]
    fn map_absent_skips_closure() {
        let calls = Cell::new(0);
        let g = map(Field::<i32>::empty(), |v| {
            calls.set(calls.get() + 1);
            v
        });
        assert!(!g.is_present());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn flat_map_present() {
        let h = flat_map(Field::new(11), |v| Field::new(v * 2));
        assert_eq!(h.get(), Some(22));
    }

    #[test]
    fn flat_map_can_produce_absent() {
        let h = flat_map(Field::new(-1), |v: i32| {
            if v >= 0 { Field::new(v as u32) } else { Field::empty() }
        });
        assert!(h.is_absent());
    }

    #[test]
    fn filter_keeps_and_drops() {
        let kept = filter(Field::new(22), |v| v % 2 == 0);
        assert_eq!(kept.get(), Some(22));

        let dropped = filter(Field::new(22), |v| v % 2 == 1);
        assert!(!dropped.is_present());

        let absent = filter(Field::<i32>::empty(), |_| true);
        assert!(absent.is_absent());
    }

    #[test]
    fn filter_keeps_alias() {
        let shared = Shared::new(4);
        let kept = filter(Field::adopt(&shared), |v| *v > 0);
        assert!(kept.is_adopted());
        shared.set(5);
        assert_eq!(kept.get(), Some(5));
    }

    #[test]
    fn map_reads_adopted_value() {
        let shared = Shared::new(2);
        let g = map(Field::adopt(&shared), |v| v * 10);
        assert_eq!(g.get(), Some(20));
        assert!(!g.is_adopted());
        assert_eq!(shared.get(), 2);
    }

    #[test]
    fn chain_stops_after_absent() {
        let calls = Cell::new(0);
        let step = |v: i32| {
            calls.set(calls.get() + 1);
            Field::new(v)
        };

        let out = flat_map(filter(map(Field::new(3), |v| v + 1), |v| *v > 10), step);
        assert!(out.is_absent());
        assert_eq!(calls.get(), 0);

        let out = flat_map(filter(map(Field::new(30), |v| v + 1), |v| *v > 10), step);
        assert_eq!(out.get(), Some(31));
        assert_eq!(calls.get(), 1);
    }
}
