//! Conversions between [`Value`] and [`serde_json::Value`].
//!
//! JSON numbers map to the widest variants: integers become `Int64` (or
//! `UInt64` above `i64::MAX`) and everything else `Float64`. Going back, every
//! integer width widens to a JSON number, strings must be UTF-8 and map keys
//! must be strings.

use serde_json::Number;

use crate::error::JsonError;
use crate::value::{Map, MapKey, Value};

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt64(u)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.into_bytes()),
            serde_json::Value::Array(arr) => Value::Seq(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (MapKey::Str(k.into_bytes()), Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = JsonError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        let json = match v {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int8(n) => (*n).into(),
            Value::Int16(n) => (*n).into(),
            Value::Int32(n) => (*n).into(),
            Value::Int64(n) => (*n).into(),
            Value::UInt8(n) => (*n).into(),
            Value::UInt16(n) => (*n).into(),
            Value::UInt32(n) => (*n).into(),
            Value::UInt64(n) => (*n).into(),
            Value::Float32(f) => float(f64::from(*f))?,
            Value::Float64(f) => float(*f)?,
            Value::Str(bytes) => serde_json::Value::String(utf8(bytes)?),
            Value::Seq(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(map) => {
                let mut obj = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    let MapKey::Str(bytes) = key else {
                        return Err(JsonError::NonStringKey(key.kind()));
                    };
                    obj.insert(utf8(bytes)?, serde_json::Value::try_from(item)?);
                }
                serde_json::Value::Object(obj)
            }
        };
        Ok(json)
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = JsonError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        serde_json::Value::try_from(&v)
    }
}

fn float(f: f64) -> Result<serde_json::Value, JsonError> {
    Number::from_f64(f)
        .map(serde_json::Value::Number)
        .ok_or(JsonError::NonFiniteFloat)
}

fn utf8(bytes: &[u8]) -> Result<String, JsonError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| JsonError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_take_the_widest_variant() {
        assert_eq!(Value::from(json!(5)), Value::Int64(5));
        assert_eq!(Value::from(json!(-5)), Value::Int64(-5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::UInt64(u64::MAX));
        assert_eq!(Value::from(json!(0.5)), Value::Float64(0.5));
    }

    #[test]
    fn objects_keep_key_order() {
        let value = Value::from(json!({"z": 1, "a": [true, null]}));
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().filter_map(MapKey::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(
            map[&MapKey::from("a")],
            Value::Seq(vec![Value::Bool(true), Value::Nil])
        );
    }

    #[test]
    fn narrow_widths_widen_back_to_json() {
        let value = Value::Seq(vec![
            Value::Int8(-3),
            Value::UInt16(700),
            Value::Float32(0.5),
            Value::from("s"),
        ]);
        assert_eq!(
            serde_json::Value::try_from(&value),
            Ok(json!([-3, 700, 0.5, "s"]))
        );
    }

    #[test]
    fn unrepresentable_values_are_rejected() {
        assert_eq!(
            serde_json::Value::try_from(Value::Float64(f64::INFINITY)),
            Err(JsonError::NonFiniteFloat)
        );
        assert_eq!(
            serde_json::Value::try_from(Value::Str(vec![0xc3, 0x28])),
            Err(JsonError::InvalidUtf8)
        );
        let int_keyed = Value::map_from_pairs(vec![(Value::Int32(1), Value::Nil)]).unwrap();
        assert_eq!(
            serde_json::Value::try_from(int_keyed),
            Err(JsonError::NonStringKey(crate::ValueKind::Int32))
        );
    }
}
