//! The dynamic value model shared by the encoder and decoder.

use std::fmt;

use indexmap::IndexMap;

use crate::error::EncodeError;

/// Ordered key/value mapping. Iteration follows insertion order, which is the
/// order pairs are encoded in and the order they were first seen on decode.
pub type Map = IndexMap<MapKey, Value>;

/// A decoded (or to-be-encoded) value.
///
/// Integer and float variants carry their exact wire width: a `UInt32(5)` is
/// always encoded with the 32-bit unsigned tag and decodes back to `UInt32`.
///
/// Equality compares floats by bit pattern, so every value equals its own
/// round-trip (including `NaN`) and `Value` can implement [`Eq`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Raw bytes. Length is measured in bytes; the content is not validated
    /// as text.
    Str(Vec<u8>),
    Seq(Vec<Value>),
    Map(Map),
}

/// The subset of [`Value`] usable as a map key: booleans, integers and
/// strings. Floats, nil and containers are excluded so keys have total
/// equality and a stable hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Str(Vec<u8>),
}

/// Variant name of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Str,
    Seq,
    Map,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Int8 => "int8",
            ValueKind::Int16 => "int16",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::UInt8 => "uint8",
            ValueKind::UInt16 => "uint16",
            ValueKind::UInt32 => "uint32",
            ValueKind::UInt64 => "uint64",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Str => "str",
            ValueKind::Seq => "seq",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int8(_) => ValueKind::Int8,
            Value::Int16(_) => ValueKind::Int16,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::UInt8(_) => ValueKind::UInt8,
            Value::UInt16(_) => ValueKind::UInt16,
            Value::UInt32(_) => ValueKind::UInt32,
            Value::UInt64(_) => ValueKind::UInt64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Str(_) => ValueKind::Str,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(n) => Some(n.into()),
            Value::Int16(n) => Some(n.into()),
            Value::Int32(n) => Some(n.into()),
            Value::Int64(n) => Some(n),
            Value::UInt8(n) => Some(n.into()),
            Value::UInt16(n) => Some(n.into()),
            Value::UInt32(n) => Some(n.into()),
            Value::UInt64(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Int8(n) => u64::try_from(n).ok(),
            Value::Int16(n) => u64::try_from(n).ok(),
            Value::Int32(n) => u64::try_from(n).ok(),
            Value::Int64(n) => u64::try_from(n).ok(),
            Value::UInt8(n) => Some(n.into()),
            Value::UInt16(n) => Some(n.into()),
            Value::UInt32(n) => Some(n.into()),
            Value::UInt64(n) => Some(n),
            _ => None,
        }
    }

    /// Either float variant, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(f) => Some(f.into()),
            Value::Float64(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The string payload, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Builds a map from dynamically typed pairs.
    ///
    /// Later duplicates overwrite earlier ones in place. Fails with
    /// [`EncodeError::UnsupportedType`] on the first key that is not a valid
    /// [`MapKey`].
    pub fn map_from_pairs<I>(pairs: I) -> Result<Value, EncodeError>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Map::with_capacity(pairs.size_hint().0);
        for (key, value) in pairs {
            map.insert(MapKey::try_from(key)?, value);
        }
        Ok(Value::Map(map))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt8(a), Value::UInt8(b)) => a == b,
            (Value::UInt16(a), Value::UInt16(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl MapKey {
    pub fn kind(&self) -> ValueKind {
        match self {
            MapKey::Bool(_) => ValueKind::Bool,
            MapKey::Int8(_) => ValueKind::Int8,
            MapKey::Int16(_) => ValueKind::Int16,
            MapKey::Int32(_) => ValueKind::Int32,
            MapKey::Int64(_) => ValueKind::Int64,
            MapKey::UInt8(_) => ValueKind::UInt8,
            MapKey::UInt16(_) => ValueKind::UInt16,
            MapKey::UInt32(_) => ValueKind::UInt32,
            MapKey::UInt64(_) => ValueKind::UInt64,
            MapKey::Str(_) => ValueKind::Str,
        }
    }

    /// The string payload, if this is a UTF-8 string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Bool(b) => Value::Bool(b),
            MapKey::Int8(n) => Value::Int8(n),
            MapKey::Int16(n) => Value::Int16(n),
            MapKey::Int32(n) => Value::Int32(n),
            MapKey::Int64(n) => Value::Int64(n),
            MapKey::UInt8(n) => Value::UInt8(n),
            MapKey::UInt16(n) => Value::UInt16(n),
            MapKey::UInt32(n) => Value::UInt32(n),
            MapKey::UInt64(n) => Value::UInt64(n),
            MapKey::Str(s) => Value::Str(s),
        }
    }
}

impl TryFrom<Value> for MapKey {
    type Error = EncodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(b)),
            Value::Int8(n) => Ok(MapKey::Int8(n)),
            Value::Int16(n) => Ok(MapKey::Int16(n)),
            Value::Int32(n) => Ok(MapKey::Int32(n)),
            Value::Int64(n) => Ok(MapKey::Int64(n)),
            Value::UInt8(n) => Ok(MapKey::UInt8(n)),
            Value::UInt16(n) => Ok(MapKey::UInt16(n)),
            Value::UInt32(n) => Ok(MapKey::UInt32(n)),
            Value::UInt64(n) => Ok(MapKey::UInt64(n)),
            Value::Str(s) => Ok(MapKey::Str(s)),
            other => Err(EncodeError::UnsupportedType(other.kind())),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Vec<u8> => Str,
    Vec<Value> => Seq,
    Map => Map,
}

macro_rules! impl_key_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MapKey {
                fn from(v: $ty) -> Self {
                    MapKey::$variant(v)
                }
            }
        )*
    };
}

impl_key_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    Vec<u8> => Str,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Str(b.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Str(s.into_bytes())
    }
}
