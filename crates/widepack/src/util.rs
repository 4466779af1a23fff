//! One-shot helpers over a default [`Encoder`] / [`Decoder`].

use crate::error::{DecodeError, EncodeError, Error};
use crate::{Decoder, Encoder, Value};

pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(value)
}

/// Decodes the first value in `input` with default limits. Trailing bytes
/// are ignored; see [`decode_exact`].
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode(input)
}

pub fn decode_with_consumed(input: &[u8]) -> Result<(Value, usize), DecodeError> {
    Decoder::new().decode_with_consumed(input)
}

pub fn decode_exact(input: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new().decode_exact(input)
}

/// Encodes a JSON document. Objects become string-keyed maps and numbers take
/// the widest integer or float variant.
pub fn encode_json(json: &serde_json::Value) -> Result<Vec<u8>, EncodeError> {
    encode(&Value::from(json.clone()))
}

/// Decodes exactly one value and converts it to JSON.
pub fn decode_json(input: &[u8]) -> Result<serde_json::Value, Error> {
    let value = decode_exact(input)?;
    Ok(serde_json::Value::try_from(&value)?)
}
