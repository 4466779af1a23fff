//! A MessagePack-style binary codec that preserves integer and float widths.
//!
//! Values are modelled by the closed [`Value`] enum. Encoding dispatches on the
//! declared variant, so a `UInt32(1)` always occupies five bytes and decodes
//! back to `UInt32`; decoding reads exactly the layout the tag byte names.
//!
//! ```
//! use widepack::{decode, encode, Value};
//!
//! let value = Value::Seq(vec![Value::Int8(1), Value::from("hi")]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes, [0x92, 0xd0, 0x01, 0xa2, b'h', b'i']);
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! Decoding untrusted input is bounded by [`DecodeLimits`].

pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod util;
pub mod value;

pub use config::DecodeLimits;
pub use constants::Tag;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, EncodeError, Error, JsonError};
pub use util::{decode, decode_exact, decode_json, decode_with_consumed, encode, encode_json};
pub use value::{Map, MapKey, Value, ValueKind};
pub use widepack_buffers::{ByteSource, IoReader, Reader};
