//! Wire tag table.
//!
//! Every encoded value starts with one marker byte. Fixed-width families use a
//! dedicated marker per width; the short ("fix") families embed a small
//! length in the low bits of the marker. All multi-byte fields that follow a
//! marker are big-endian.

use crate::error::DecodeError;

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xa0;

/// Largest length a fixstr marker can carry.
pub const MAX_FIXSTR_LEN: usize = 0x1f;
/// Largest element count a fixarray marker can carry.
pub const MAX_FIXARRAY_LEN: usize = 0x0f;
/// Largest pair count a fixmap marker can carry.
pub const MAX_FIXMAP_LEN: usize = 0x0f;
/// Largest length any length-prefixed family can carry.
pub const MAX_LEN: usize = u32::MAX as usize;

/// A classified marker byte.
///
/// The short forms carry their embedded length; the prefixed forms name the
/// width of the length field that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Nil,
    False,
    True,
    Float32,
    Float64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    FixStr(u8),
    Str8,
    Str16,
    Str32,
    FixArray(u8),
    Array16,
    Array32,
    FixMap(u8),
    Map16,
    Map32,
}

impl Tag {
    /// Classifies a marker byte, or returns `None` if it belongs to no family.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let tag = match byte {
            0x80..=0x8f => Tag::FixMap(byte & 0x0f),
            0x90..=0x9f => Tag::FixArray(byte & 0x0f),
            0xa0..=0xbf => Tag::FixStr(byte & 0x1f),
            NIL => Tag::Nil,
            FALSE => Tag::False,
            TRUE => Tag::True,
            FLOAT32 => Tag::Float32,
            FLOAT64 => Tag::Float64,
            UINT8 => Tag::UInt8,
            UINT16 => Tag::UInt16,
            UINT32 => Tag::UInt32,
            UINT64 => Tag::UInt64,
            INT8 => Tag::Int8,
            INT16 => Tag::Int16,
            INT32 => Tag::Int32,
            INT64 => Tag::Int64,
            STR8 => Tag::Str8,
            STR16 => Tag::Str16,
            STR32 => Tag::Str32,
            ARRAY16 => Tag::Array16,
            ARRAY32 => Tag::Array32,
            MAP16 => Tag::Map16,
            MAP32 => Tag::Map32,
            _ => return None,
        };
        Some(tag)
    }

    /// The marker byte for this tag.
    pub fn to_byte(self) -> u8 {
        match self {
            Tag::Nil => NIL,
            Tag::False => FALSE,
            Tag::True => TRUE,
            Tag::Float32 => FLOAT32,
            Tag::Float64 => FLOAT64,
            Tag::UInt8 => UINT8,
            Tag::UInt16 => UINT16,
            Tag::UInt32 => UINT32,
            Tag::UInt64 => UINT64,
            Tag::Int8 => INT8,
            Tag::Int16 => INT16,
            Tag::Int32 => INT32,
            Tag::Int64 => INT64,
            Tag::FixStr(len) => FIXSTR | (len & 0x1f),
            Tag::Str8 => STR8,
            Tag::Str16 => STR16,
            Tag::Str32 => STR32,
            Tag::FixArray(len) => FIXARRAY | (len & 0x0f),
            Tag::Array16 => ARRAY16,
            Tag::Array32 => ARRAY32,
            Tag::FixMap(len) => FIXMAP | (len & 0x0f),
            Tag::Map16 => MAP16,
            Tag::Map32 => MAP32,
        }
    }

    /// Builds a fixstr tag, failing if `len` does not fit in five bits.
    pub fn fixstr(len: usize) -> Result<Self, DecodeError> {
        short_len(FIXSTR, len, MAX_FIXSTR_LEN).map(Tag::FixStr)
    }

    /// Builds a fixarray tag, failing if `len` does not fit in four bits.
    pub fn fixarray(len: usize) -> Result<Self, DecodeError> {
        short_len(FIXARRAY, len, MAX_FIXARRAY_LEN).map(Tag::FixArray)
    }

    /// Builds a fixmap tag, failing if `len` does not fit in four bits.
    pub fn fixmap(len: usize) -> Result<Self, DecodeError> {
        short_len(FIXMAP, len, MAX_FIXMAP_LEN).map(Tag::FixMap)
    }

    /// Width in bytes of the length prefix that follows the marker; zero for
    /// short forms and scalars.
    pub fn length_width(self) -> usize {
        match self {
            Tag::Str8 => 1,
            Tag::Str16 | Tag::Array16 | Tag::Map16 => 2,
            Tag::Str32 | Tag::Array32 | Tag::Map32 => 4,
            _ => 0,
        }
    }
}

fn short_len(marker: u8, len: usize, max: usize) -> Result<u8, DecodeError> {
    if len > max {
        return Err(DecodeError::InvalidLength {
            tag: marker,
            length: len as u64,
        });
    }
    Ok(len as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_byte_round_trips_through_tag() {
        let mut known = 0;
        for byte in 0..=u8::MAX {
            if let Some(tag) = Tag::from_byte(byte) {
                assert_eq!(tag.to_byte(), byte, "tag {tag:?}");
                known += 1;
            }
        }
        // 16 fixmap + 16 fixarray + 32 fixstr + 20 single markers.
        assert_eq!(known, 16 + 16 + 32 + 20);
    }

    #[test]
    fn bytes_outside_the_table_are_unknown() {
        let unknown = [
            0x00, 0x01, 0x7f, 0xc1, 0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xd4, 0xd5, 0xd6, 0xd7,
            0xd8, 0xe0, 0xff,
        ];
        for byte in unknown {
            assert_eq!(Tag::from_byte(byte), None, "byte {byte:#04x}");
        }
    }

    #[test]
    fn short_forms_embed_their_length() {
        assert_eq!(Tag::from_byte(0xa5), Some(Tag::FixStr(5)));
        assert_eq!(Tag::from_byte(0xbf), Some(Tag::FixStr(31)));
        assert_eq!(Tag::from_byte(0x93), Some(Tag::FixArray(3)));
        assert_eq!(Tag::from_byte(0x82), Some(Tag::FixMap(2)));
        assert_eq!(Tag::fixstr(31).map(Tag::to_byte), Ok(0xbf));
        assert_eq!(Tag::fixarray(0).map(Tag::to_byte), Ok(0x90));
    }

    #[test]
    fn short_form_rejects_out_of_range_length() {
        assert_eq!(
            Tag::fixstr(32),
            Err(DecodeError::InvalidLength {
                tag: FIXSTR,
                length: 32
            })
        );
        assert!(Tag::fixarray(16).is_err());
        assert!(Tag::fixmap(16).is_err());
    }

    #[test]
    fn length_prefix_widths() {
        assert_eq!(Tag::Str8.length_width(), 1);
        assert_eq!(Tag::Array16.length_width(), 2);
        assert_eq!(Tag::Int16.length_width(), 0);
        assert_eq!(Tag::Map32.length_width(), 4);
        assert_eq!(Tag::FixMap(3).length_width(), 0);
    }
}
