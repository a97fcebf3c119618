//! Optfield provides `Field<T>`, a value that is either present or absent.
//!
//! Core concepts:
//! - **Field**: holds zero or one value, independent of any null `T` can hold
//! - **Shared**: a handle whose value fields can adopt by reference
//! - **Combinators**: `map`, `flat_map` and `filter`, free functions that may change `T`
//! - **Codec**: encodes and decodes a single bare field (JSON and CBOR)
//!
//! # Example
//!
//! ```
//! use optfield_core::{Field, map};
//!
//! let mut age: Field<u32> = Field::empty();
//! assert!(!age.is_present());
//! assert_eq!(age.to_string(), "<none>");
//!
//! age.set(0);
//! assert_eq!(age.get(), Some(0));
//!
//! let label = map(age, |years| format!("{years} years"));
//! assert_eq!(label.must_get(), "0 years");
//! ```
//!
//! # Serialization
//!
//! A present field serializes as its bare value and an absent one as null.
//! Null always deserializes as absent. Inside a struct, mark fields with
//! `#[serde(default, skip_serializing_if = "Field::is_zero")]`, or put
//! [`optional_fields`] on the struct, to leave absent fields out entirely:
//!
//! ```
//! use optfield_core::Field;
//! use serde::{Deserialize, Serialize};
//!
//! #[optfield_core::optional_fields]
//! #[derive(Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: Field<u32>,
//! }
//!
//! let mut person = Person { name: "Ava".to_string(), age: Field::empty() };
//! assert_eq!(serde_json::to_string(&person).unwrap(), r#"{"name":"Ava"}"#);
//!
//! person.age.set(0);
//! assert_eq!(serde_json::to_string(&person).unwrap(), r#"{"name":"Ava","age":0}"#);
//! ```

mod codec;
mod combinators;
mod error;
mod field;
mod shared;

pub use codec::{Cbor, Codec, Json};
pub use combinators::{filter, flat_map, map};
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use field::{Field, FieldMut, NONE_SENTINEL};
pub use shared::Shared;

#[cfg(feature = "derive")]
pub use optfield_derive::optional_fields;
