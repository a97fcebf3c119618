use std::ops::Range;

use thiserror::Error;

/// The codec error behind a [`DecodeError`], kept intact.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cbor(#[from] ciborium::de::Error<std::io::Error>),
    /// A complete value was read but input remained after it.
    #[error("{count} trailing bytes after value")]
    TrailingBytes { count: usize },
}

/// Error type for encoding a field.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cbor(#[from] ciborium::ser::Error<std::io::Error>),
}

/// Error type for decoding a present field.
///
/// Carries the field name (when the caller supplied one), the byte span of
/// the input where decoding failed, and the raw input itself.
#[derive(Debug, Error)]
#[error(
    "failed to decode {} at bytes {}..{} of {}: {kind}",
    label(.field.as_deref()),
    .span.start,
    .span.end,
    excerpt(.input)
)]
pub struct DecodeError {
    field: Option<String>,
    span: Range<usize>,
    input: Vec<u8>,
    #[source]
    kind: DecodeErrorKind,
}

impl DecodeError {
    pub(crate) fn new(
        field: Option<&str>,
        span: Range<usize>,
        input: &[u8],
        kind: DecodeErrorKind,
    ) -> Self {
        DecodeError {
            field: field.map(str::to_owned),
            span,
            input: input.to_vec(),
            kind,
        }
    }

    /// Returns the name of the field being decoded, if known.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the byte range of the input where decoding failed.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the raw input that failed to decode.
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Returns the bytes covered by [`DecodeError::span`].
    pub fn offending_bytes(&self) -> &[u8] {
        &self.input[self.span.clone()]
    }

    /// Returns the underlying codec error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Consumes the error, returning the underlying codec error.
    pub fn into_kind(self) -> DecodeErrorKind {
        self.kind
    }
}

pub(crate) fn label(field: Option<&str>) -> String {
    match field {
        Some(name) => format!("field `{name}`"),
        None => "field".to_string(),
    }
}

const EXCERPT_LEN: usize = 64;

fn excerpt(input: &[u8]) -> String {
    if input.len() <= EXCERPT_LEN {
        format!("{:?}", String::from_utf8_lossy(input))
    } else {
        format!("{:?}...", String::from_utf8_lossy(&input[..EXCERPT_LEN]))
    }
}
