//! Byte-level encode/decode hooks for a single bare field.
//!
//! A bare field has no enclosing structure to omit it from, so an absent
//! field is written as the codec's null. Inside a struct, omission is handled
//! by serde through [`Field::is_zero`] instead.

use std::ops::Range;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{label, DecodeError, DecodeErrorKind, EncodeError};
use crate::field::Field;

/// An encoding that fields can be written to and read from.
pub trait Codec {
    /// Encodes a field: its value if present, the codec's null if absent.
    fn encode<T: Serialize>(field: &Field<T>) -> Result<Vec<u8>, EncodeError>;

    /// Decodes a field, attributing failures to `name` when given.
    ///
    /// A null token decodes as absent. Anything else must decode as `T`.
    fn decode_field<T: DeserializeOwned>(
        name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Field<T>, DecodeError>;

    /// Decodes an anonymous field.
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Field<T>, DecodeError> {
        Self::decode_field(None, bytes)
    }

    /// Decodes a field, naming it in any error.
    fn decode_named<T: DeserializeOwned>(
        name: &str,
        bytes: &[u8],
    ) -> Result<Field<T>, DecodeError> {
        Self::decode_field(Some(name), bytes)
    }
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

/// CBOR via `ciborium`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cbor;

impl Codec for Json {
    fn encode<T: Serialize>(field: &Field<T>) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(field)?)
    }

    fn decode_field<T: DeserializeOwned>(
        name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Field<T>, DecodeError> {
        if bytes.trim_ascii() == b"null" {
            log::trace!("{} is null, decoding as absent", label(name));
            return Ok(Field::empty());
        }
        match serde_json::from_slice::<T>(bytes) {
            Ok(value) => Ok(Field::new(value)),
            Err(err) => {
                let span = json_span(bytes, &err);
                log::debug!("{} failed to decode at bytes {:?}: {}", label(name), span, err);
                Err(DecodeError::new(name, span, bytes, DecodeErrorKind::Json(err)))
            }
        }
    }
}

impl Codec for Cbor {
    fn encode<T: Serialize>(field: &Field<T>) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        ciborium::into_writer(field, &mut out)?;
        Ok(out)
    }

    fn decode_field<T: DeserializeOwned>(
        name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Field<T>, DecodeError> {
        // Null and undefined both arrive as serde's "none"
        let mut reader = bytes;
        match ciborium::from_reader::<Field<T>, _>(&mut reader) {
            Ok(_) if !reader.is_empty() => {
                let span = (bytes.len() - reader.len())..bytes.len();
                log::debug!("{} has {} trailing bytes at {:?}", label(name), reader.len(), span);
                let kind = DecodeErrorKind::TrailingBytes { count: reader.len() };
                Err(DecodeError::new(name, span, bytes, kind))
            }
            Ok(field) => {
                if field.is_absent() {
                    log::trace!("{} is null, decoding as absent", label(name));
                }
                Ok(field)
            }
            Err(err) => {
                let span = cbor_span(bytes, &err);
                log::debug!("{} failed to decode at bytes {:?}: {}", label(name), span, err);
                Err(DecodeError::new(name, span, bytes, DecodeErrorKind::Cbor(err)))
            }
        }
    }
}

/// Converts serde_json's 1-based line/column into a one-byte span.
fn json_span(input: &[u8], err: &serde_json::Error) -> Range<usize> {
    if err.line() == 0 {
        return 0..input.len();
    }
    let line_start: usize = input
        .split_inclusive(|b| *b == b'\n')
        .take(err.line() - 1)
        .map(<[u8]>::len)
        .sum();
    byte_span(input, line_start + err.column().saturating_sub(1))
}

fn cbor_span(input: &[u8], err: &ciborium::de::Error<std::io::Error>) -> Range<usize> {
    match err {
        ciborium::de::Error::Syntax(offset) => byte_span(input, *offset),
        ciborium::de::Error::Semantic(Some(offset), _) => byte_span(input, *offset),
        _ => 0..input.len(),
    }
}

fn byte_span(input: &[u8], offset: usize) -> Range<usize> {
    let start = offset.min(input.len());
    start..(start + 1).min(input.len())
}
