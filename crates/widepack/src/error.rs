//! Error types for each codec direction.

use std::io;

use thiserror::Error;
use widepack_buffers::BufferError;

use crate::value::ValueKind;

/// Error returned while decoding bytes into a [`Value`](crate::Value).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remained than the field starting at `offset` requires.
    #[error("unexpected end of input: needed {needed} byte(s) at offset {offset}")]
    UnexpectedEndOfInput { offset: usize, needed: usize },
    #[error("unknown tag 0x{byte:02x} at offset {offset}")]
    UnknownTag { offset: usize, byte: u8 },
    /// A length field is outside the range its tag (or the configured limits)
    /// allow.
    #[error("invalid length {length} for tag 0x{tag:02x}")]
    InvalidLength { tag: u8, length: u64 },
    #[error("nesting depth exceeds {max} at offset {offset}")]
    DepthLimitExceeded { offset: usize, max: usize },
    #[error("more than {max} values decoded (offset {offset})")]
    ItemLimitExceeded { offset: usize, max: usize },
    /// A map key decoded to a variant that cannot be a key.
    #[error("{kind} cannot be used as a map key (offset {offset})")]
    UnsupportedKey { offset: usize, kind: ValueKind },
    #[error("{remaining} trailing byte(s) after value at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
    #[error("i/o error: {0:?}")]
    Io(io::ErrorKind),
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, needed } => {
                DecodeError::UnexpectedEndOfInput { offset, needed }
            }
            BufferError::Io(kind) => DecodeError::Io(kind),
        }
    }
}

/// Error returned while encoding a [`Value`](crate::Value) into bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value has no mapping in the position it was given (e.g. a float
    /// used as a map key).
    #[error("unsupported type: {0}")]
    UnsupportedType(ValueKind),
    /// A string, array or map is longer than the largest length class.
    #[error("{kind} of length {len} exceeds the 2^32-1 limit")]
    ValueTooLarge { kind: ValueKind, len: usize },
    #[error("i/o error: {0:?}")]
    Io(io::ErrorKind),
}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> Self {
        EncodeError::Io(err.kind())
    }
}

/// Error returned by the JSON bridge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("non-finite float has no JSON representation")]
    NonFiniteFloat,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("JSON object keys must be strings, found {0}")]
    NonStringKey(ValueKind),
}

/// Umbrella error for the convenience helpers that span several stages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Json(#[from] JsonError),
}
