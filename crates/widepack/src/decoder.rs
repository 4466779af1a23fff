//! Recursive-descent decoder: bytes → [`Value`].

use std::io::Read;

use tracing::{debug, trace};
use widepack_buffers::{ByteSource, IoReader, Reader};

use crate::config::DecodeLimits;
use crate::constants::Tag;
use crate::error::DecodeError;
use crate::value::{Map, MapKey, Value};

/// Pre-allocation budget, in bytes, when the source cannot report how many
/// bytes it has left.
const STREAM_PREALLOC: usize = 1024;

/// Decodes one value per call under a fixed set of [`DecodeLimits`].
///
/// The decoder holds no per-call state, so one instance can be shared across
/// threads and reused for any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    limits: DecodeLimits,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decodes the value at the start of `input`. Bytes after it are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        self.decode_with_consumed(input).map(|(value, _)| value)
    }

    /// Decodes the value at the start of `input` and reports how many bytes it
    /// occupied.
    pub fn decode_with_consumed(&self, input: &[u8]) -> Result<(Value, usize), DecodeError> {
        let mut reader = Reader::new(input);
        let value = self.read_value(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Decodes `input`, which must hold exactly one value.
    pub fn decode_exact(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let (value, consumed) = self.decode_with_consumed(input)?;
        if consumed != input.len() {
            let remaining = input.len() - consumed;
            debug!(offset = consumed, remaining, "trailing bytes after value");
            return Err(DecodeError::TrailingBytes {
                offset: consumed,
                remaining,
            });
        }
        Ok(value)
    }

    /// Decodes one value from a blocking stream, reading only the bytes the
    /// value occupies.
    pub fn decode_from_reader<R: Read>(&self, reader: R) -> Result<Value, DecodeError> {
        self.read_value(&mut IoReader::new(reader))
    }

    /// Reads one value from `source`, leaving it positioned just past the
    /// value. Useful for walking a buffer of concatenated values.
    pub fn read_value<S: ByteSource>(&self, source: &mut S) -> Result<Value, DecodeError> {
        let start = source.position();
        trace!(offset = start, "decode start");
        let mut run = Run::new(source, self.limits);
        match run.read_any(0) {
            Ok(value) => {
                trace!(
                    consumed = run.src.position() - start,
                    items = run.items,
                    "decode done"
                );
                Ok(value)
            }
            Err(err) => {
                debug!(error = %err, "decode rejected input");
                Err(err)
            }
        }
    }
}

/// State for a single decode call.
struct Run<'s, S> {
    src: &'s mut S,
    limits: DecodeLimits,
    items: usize,
    /// Bytes promised to the pre-allocations of the containers still open.
    reserved: usize,
}

impl<'s, S: ByteSource> Run<'s, S> {
    fn new(src: &'s mut S, limits: DecodeLimits) -> Self {
        Self {
            src,
            limits,
            items: 0,
            reserved: 0,
        }
    }

    /// Reads one tagged value. `depth` is the number of containers enclosing
    /// it.
    fn read_any(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let offset = self.src.position();
        let byte = self.src.read_u8()?;
        let tag = Tag::from_byte(byte).ok_or(DecodeError::UnknownTag { offset, byte })?;
        self.count(offset)?;

        let value = match tag {
            Tag::Nil => Value::Nil,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::Float32 => Value::Float32(self.src.read_f32()?),
            Tag::Float64 => Value::Float64(self.src.read_f64()?),
            Tag::UInt8 => Value::UInt8(self.src.read_u8()?),
            Tag::UInt16 => Value::UInt16(self.src.read_u16()?),
            Tag::UInt32 => Value::UInt32(self.src.read_u32()?),
            Tag::UInt64 => Value::UInt64(self.src.read_u64()?),
            Tag::Int8 => Value::Int8(self.src.read_i8()?),
            Tag::Int16 => Value::Int16(self.src.read_i16()?),
            Tag::Int32 => Value::Int32(self.src.read_i32()?),
            Tag::Int64 => Value::Int64(self.src.read_i64()?),
            Tag::FixStr(_) | Tag::Str8 | Tag::Str16 | Tag::Str32 => {
                let len = self.read_len(tag)?;
                self.read_str(byte, len)?
            }
            Tag::FixArray(_) | Tag::Array16 | Tag::Array32 => {
                let len = self.read_len(tag)?;
                self.read_seq(offset, byte, len, depth)?
            }
            Tag::FixMap(_) | Tag::Map16 | Tag::Map32 => {
                let len = self.read_len(tag)?;
                self.read_map(offset, byte, len, depth)?
            }
        };
        Ok(value)
    }

    fn count(&mut self, offset: usize) -> Result<(), DecodeError> {
        self.items += 1;
        if self.items > self.limits.max_items {
            return Err(DecodeError::ItemLimitExceeded {
                offset,
                max: self.limits.max_items,
            });
        }
        Ok(())
    }

    /// Embedded length for short forms, otherwise the big-endian prefix.
    fn read_len(&mut self, tag: Tag) -> Result<u64, DecodeError> {
        let len = match (tag, tag.length_width()) {
            (Tag::FixStr(n) | Tag::FixArray(n) | Tag::FixMap(n), _) => n.into(),
            (_, 1) => self.src.read_u8()?.into(),
            (_, 2) => self.src.read_u16()?.into(),
            (_, 4) => self.src.read_u32()?.into(),
            _ => 0,
        };
        Ok(len)
    }

    fn read_str(&mut self, marker: u8, len: u64) -> Result<Value, DecodeError> {
        let len = usize::try_from(len)
            .ok()
            .filter(|&n| n <= self.limits.max_str_len)
            .ok_or(DecodeError::InvalidLength {
                tag: marker,
                length: len,
            })?;
        Ok(Value::Str(self.src.read_vec(len)?))
    }

    fn read_seq(
        &mut self,
        offset: usize,
        marker: u8,
        len: u64,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        self.enter(offset, depth)?;
        let len = self.container_len(marker, len, 1)?;
        let cap = self.reserve(len, 1);
        let mut items = Vec::with_capacity(cap);
        for _ in 0..len {
            items.push(self.read_any(depth + 1)?);
        }
        self.release(cap, 1);
        Ok(Value::Seq(items))
    }

    fn read_map(
        &mut self,
        offset: usize,
        marker: u8,
        len: u64,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        self.enter(offset, depth)?;
        let len = self.container_len(marker, len, 2)?;
        let cap = self.reserve(len, 2);
        let mut map = Map::with_capacity(cap);
        for _ in 0..len {
            let key_offset = self.src.position();
            let key = self.read_any(depth + 1)?;
            let kind = key.kind();
            let key = MapKey::try_from(key).map_err(|_| DecodeError::UnsupportedKey {
                offset: key_offset,
                kind,
            })?;
            let value = self.read_any(depth + 1)?;
            // Last write wins; the entry keeps its first position.
            map.insert(key, value);
        }
        self.release(cap, 2);
        Ok(Value::Map(map))
    }

    fn enter(&self, offset: usize, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.limits.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                offset,
                max: self.limits.max_depth,
            });
        }
        Ok(())
    }

    /// Converts a declared element count and rejects counts the source cannot
    /// possibly satisfy, given each element takes at least `min_bytes` bytes.
    fn container_len(&self, marker: u8, len: u64, min_bytes: usize) -> Result<usize, DecodeError> {
        let len = usize::try_from(len).map_err(|_| DecodeError::InvalidLength {
            tag: marker,
            length: len,
        })?;
        if let Some(remaining) = self.src.remaining() {
            let needed = len.saturating_mul(min_bytes);
            if needed > remaining {
                return Err(DecodeError::UnexpectedEndOfInput {
                    offset: self.src.position(),
                    needed,
                });
            }
        }
        Ok(len)
    }

    /// Capacity to pre-allocate for a container of `len` elements.
    ///
    /// Every open container draws on one budget: the bytes the source can
    /// still provide, less what enclosing containers already reserved. Nested
    /// forged counts therefore share a single input's worth of capacity.
    fn reserve(&mut self, len: usize, min_bytes: usize) -> usize {
        let budget = self.src.remaining().unwrap_or(STREAM_PREALLOC);
        let cap = len.min(budget.saturating_sub(self.reserved) / min_bytes);
        self.reserved += cap * min_bytes;
        cap
    }

    fn release(&mut self, cap: usize, min_bytes: usize) {
        self.reserved -= cap * min_bytes;
    }
}
