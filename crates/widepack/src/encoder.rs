//! Width-preserving encoder: [`Value`] → bytes.
//!
//! Scalars are written with the tag of their declared variant and a full-width
//! payload, whatever their magnitude. Only the length classes of strings,
//! arrays and maps are chosen by size.

use std::io::Write;

use tracing::{debug, trace};
use widepack_buffers::Writer;

use crate::constants::{
    ARRAY16, ARRAY32, FALSE, FIXARRAY, FIXMAP, FIXSTR, FLOAT32, FLOAT64, INT16, INT32, INT64,
    INT8, MAP16, MAP32, MAX_FIXARRAY_LEN, MAX_FIXMAP_LEN, MAX_FIXSTR_LEN, NIL, STR16, STR32, STR8,
    TRUE, UINT16, UINT32, UINT64, UINT8,
};
use crate::error::EncodeError;
use crate::value::{MapKey, Value, ValueKind};

/// Encodes [`Value`] trees. The internal buffer is reused across calls.
#[derive(Debug, Clone)]
pub struct Encoder {
    pub writer: Writer,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes `value` into a fresh byte vector. On failure nothing is
    /// returned and the internal buffer is left empty.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        trace!(kind = %value.kind(), "encode start");
        self.write_any(value)?;
        trace!(bytes = self.writer.len(), "encode done");
        Ok(self.writer.flush())
    }

    /// Encodes `value` and writes the bytes to `sink` in one `write_all`.
    /// Returns the number of bytes written.
    pub fn encode_into<W: Write>(
        &mut self,
        value: &Value,
        mut sink: W,
    ) -> Result<usize, EncodeError> {
        let bytes = self.encode(value)?;
        sink.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Encodes a map given as dynamically typed pairs, in the given order.
    ///
    /// Keys must be booleans, integers or strings; anything else fails with
    /// [`EncodeError::UnsupportedType`]. Duplicate keys are written as-is, so
    /// a decoder will keep the last one.
    pub fn encode_pairs(&mut self, pairs: &[(Value, Value)]) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        let result = self.write_map_hdr(pairs.len()).and_then(|()| {
            pairs.iter().try_for_each(|(key, value)| {
                check_key(key)?;
                self.write_value(key)?;
                self.write_value(value)
            })
        });
        match result {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                debug!(error = %err, "encode rejected pairs");
                self.writer.reset();
                Err(err)
            }
        }
    }

    /// Appends `value` to the writer. On failure the writer is rolled back to
    /// where it was before the call.
    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        let mark = self.writer.len();
        self.write_value(value).inspect_err(|err| {
            debug!(error = %err, kind = %value.kind(), "encode rejected value");
            self.writer.truncate(mark);
        })
    }

    fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.writer.u8(NIL),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int8(n) => {
                self.writer.u8(INT8);
                self.writer.i8(*n);
            }
            Value::Int16(n) => {
                self.writer.u8(INT16);
                self.writer.i16(*n);
            }
            Value::Int32(n) => {
                self.writer.u8(INT32);
                self.writer.i32(*n);
            }
            Value::Int64(n) => {
                self.writer.u8(INT64);
                self.writer.i64(*n);
            }
            Value::UInt8(n) => {
                self.writer.u8(UINT8);
                self.writer.u8(*n);
            }
            Value::UInt16(n) => self.writer.u8u16(UINT16, *n),
            Value::UInt32(n) => self.writer.u8u32(UINT32, *n),
            Value::UInt64(n) => self.writer.u8u64(UINT64, *n),
            Value::Float32(f) => self.writer.u8f32(FLOAT32, *f),
            Value::Float64(f) => self.writer.u8f64(FLOAT64, *f),
            Value::Str(bytes) => self.write_str(bytes)?,
            Value::Seq(items) => {
                self.write_arr_hdr(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Map(map) => {
                self.write_map_hdr(map.len())?;
                for (key, item) in map {
                    self.write_key(key)?;
                    self.write_value(item)?;
                }
            }
        }
        Ok(())
    }

    fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    /// Writes a map key with the same layout its [`Value`] counterpart uses.
    pub fn write_key(&mut self, key: &MapKey) -> Result<(), EncodeError> {
        match key {
            MapKey::Bool(b) => self.write_bool(*b),
            MapKey::Int8(n) => {
                self.writer.u8(INT8);
                self.writer.i8(*n);
            }
            MapKey::Int16(n) => {
                self.writer.u8(INT16);
                self.writer.i16(*n);
            }
            MapKey::Int32(n) => {
                self.writer.u8(INT32);
                self.writer.i32(*n);
            }
            MapKey::Int64(n) => {
                self.writer.u8(INT64);
                self.writer.i64(*n);
            }
            MapKey::UInt8(n) => {
                self.writer.u8(UINT8);
                self.writer.u8(*n);
            }
            MapKey::UInt16(n) => self.writer.u8u16(UINT16, *n),
            MapKey::UInt32(n) => self.writer.u8u32(UINT32, *n),
            MapKey::UInt64(n) => self.writer.u8u64(UINT64, *n),
            MapKey::Str(bytes) => self.write_str(bytes)?,
        }
        Ok(())
    }

    pub fn write_str(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_str_hdr(bytes.len())?;
        self.writer.buf(bytes);
        Ok(())
    }

    /// Smallest string class whose capacity covers `length` bytes.
    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let len = wire_len(ValueKind::Str, length)?;
        if length <= MAX_FIXSTR_LEN {
            self.writer.u8(FIXSTR | len as u8);
        } else if len <= 0xff {
            self.writer.u8(STR8);
            self.writer.u8(len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(STR16, len as u16);
        } else {
            self.writer.u8u32(STR32, len);
        }
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let len = wire_len(ValueKind::Seq, length)?;
        if length <= MAX_FIXARRAY_LEN {
            self.writer.u8(FIXARRAY | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(ARRAY16, len as u16);
        } else {
            self.writer.u8u32(ARRAY32, len);
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let len = wire_len(ValueKind::Map, length)?;
        if length <= MAX_FIXMAP_LEN {
            self.writer.u8(FIXMAP | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(MAP16, len as u16);
        } else {
            self.writer.u8u32(MAP32, len);
        }
        Ok(())
    }
}

fn wire_len(kind: ValueKind, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::ValueTooLarge { kind, len })
}

fn check_key(key: &Value) -> Result<(), EncodeError> {
    match key {
        Value::Nil | Value::Float32(_) | Value::Float64(_) | Value::Seq(_) | Value::Map(_) => {
            Err(EncodeError::UnsupportedType(key.kind()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_writers_pick_the_smallest_class() {
        let mut encoder = Encoder::new();
        encoder.write_str_hdr(0).unwrap();
        encoder.write_str_hdr(32).unwrap();
        encoder.write_arr_hdr(16).unwrap();
        encoder.write_map_hdr(65_536).unwrap();
        assert_eq!(
            encoder.writer.flush(),
            vec![0xa0, 0xd9, 0x20, 0xdc, 0x00, 0x10, 0xdf, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn header_rejects_lengths_beyond_u32() {
        let mut encoder = Encoder::new();
        let len = u32::MAX as usize + 1;
        assert_eq!(
            encoder.write_str_hdr(len),
            Err(EncodeError::ValueTooLarge {
                kind: ValueKind::Str,
                len
            })
        );
        assert!(encoder.write_arr_hdr(len).is_err());
        assert!(encoder.write_map_hdr(len).is_err());
        assert!(encoder.writer.is_empty());
    }

    #[test]
    fn write_any_appends_after_existing_output() {
        let mut encoder = Encoder::new();
        encoder.write_any(&Value::Nil).unwrap();
        encoder.write_any(&Value::UInt8(1)).unwrap();
        assert_eq!(encoder.writer.as_slice(), &[0xc0, 0xcc, 0x01]);
    }

    #[test]
    fn encode_pairs_rejects_float_key_without_output() {
        let mut encoder = Encoder::new();
        let pairs = vec![
            (Value::from("ok"), Value::Nil),
            (Value::Float64(1.0), Value::Nil),
        ];
        assert_eq!(
            encoder.encode_pairs(&pairs),
            Err(EncodeError::UnsupportedType(ValueKind::Float64))
        );
        assert!(encoder.writer.is_empty());
    }

    #[test]
    fn encode_pairs_keeps_duplicates_in_order() {
        let mut encoder = Encoder::new();
        let pairs = vec![
            (Value::Int8(1), Value::Bool(false)),
            (Value::Int8(1), Value::Bool(true)),
        ];
        assert_eq!(
            encoder.encode_pairs(&pairs).unwrap(),
            vec![0x82, 0xd0, 0x01, 0xc2, 0xd0, 0x01, 0xc3]
        );
    }

    #[test]
    fn encode_into_writes_to_sink() {
        let mut encoder = Encoder::new();
        let mut sink = Vec::new();
        let n = encoder.encode_into(&Value::Int16(2000), &mut sink).unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink, vec![0xd1, 0x07, 0xd0]);
    }
}
