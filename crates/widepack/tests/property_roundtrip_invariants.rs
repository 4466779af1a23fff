use proptest::collection::vec;
use proptest::prelude::*;
use widepack::{
    decode, decode_exact, decode_json, decode_with_consumed, encode, encode_json, DecodeError,
    Map, MapKey, Value,
};

fn bytes() -> impl Strategy<Value = Vec<u8>> {
    // Crosses the fixstr/str8 boundary often enough to matter.
    vec(any::<u8>(), 0..48)
}

fn map_key() -> impl Strategy<Value = MapKey> {
    prop_oneof![
        any::<bool>().prop_map(MapKey::Bool),
        any::<i8>().prop_map(MapKey::Int8),
        any::<i16>().prop_map(MapKey::Int16),
        any::<i32>().prop_map(MapKey::Int32),
        any::<i64>().prop_map(MapKey::Int64),
        any::<u8>().prop_map(MapKey::UInt8),
        any::<u16>().prop_map(MapKey::UInt16),
        any::<u32>().prop_map(MapKey::UInt32),
        any::<u64>().prop_map(MapKey::UInt64),
        bytes().prop_map(MapKey::Str),
    ]
}

fn integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i8>().prop_map(Value::Int8),
        any::<i16>().prop_map(Value::Int16),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        any::<u8>().prop_map(Value::UInt8),
        any::<u16>().prop_map(Value::UInt16),
        any::<u32>().prop_map(Value::UInt32),
        any::<u64>().prop_map(Value::UInt64),
    ]
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        integer(),
        // Raw bits so NaN payloads and signed zeros are covered.
        any::<u32>().prop_map(|b| Value::Float32(f32::from_bits(b))),
        any::<u64>().prop_map(|b| Value::Float64(f64::from_bits(b))),
        bytes().prop_map(Value::Str),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..20).prop_map(Value::Seq),
            vec((map_key(), inner), 0..20)
                .prop_map(|pairs| Value::Map(pairs.into_iter().collect::<Map>())),
        ]
    })
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int64),
        any::<f64>()
            .prop_filter("JSON numbers are finite", |f| f.is_finite())
            .prop_map(Value::Float64),
        ".{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::Seq),
            vec(("[a-z]{0,6}", inner), 0..6).prop_map(|pairs| {
                Value::Map(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (MapKey::from(k), v))
                        .collect::<Map>(),
                )
            }),
        ]
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(v in value()) {
        let bytes = encode(&v).unwrap();
        prop_assert_eq!(decode_exact(&bytes), Ok(v));
    }

    #[test]
    fn reencoding_a_decoded_value_is_byte_identical(v in value()) {
        // Map equality ignores order, so compare bytes to pin it down.
        let bytes = encode(&v).unwrap();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn truncated_input_reports_end_of_input(v in value()) {
        let bytes = encode(&v).unwrap();
        for cut in 0..bytes.len() {
            let result = decode(&bytes[..cut]);
            prop_assert!(
                matches!(result, Err(DecodeError::UnexpectedEndOfInput { .. })),
                "cut at {}: {:?}",
                cut,
                result
            );
        }
    }

    #[test]
    fn trailing_bytes_are_left_unconsumed(
        v in value(),
        tail in vec(any::<u8>(), 1..8),
    ) {
        let mut bytes = encode(&v).unwrap();
        let len = bytes.len();
        bytes.extend_from_slice(&tail);
        prop_assert_eq!(decode_with_consumed(&bytes), Ok((v, len)));
        let is_trailing = matches!(
            decode_exact(&bytes),
            Err(DecodeError::TrailingBytes { remaining, .. }) if remaining == tail.len()
        );
        prop_assert!(is_trailing);
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in vec(any::<u8>(), 0..256)) {
        if let Ok((_, consumed)) = decode_with_consumed(&data) {
            prop_assert!(consumed <= data.len());
        }
    }

    #[test]
    fn json_bridge_roundtrips(v in json_value()) {
        let json = serde_json::Value::try_from(&v).unwrap();
        prop_assert_eq!(Value::from(json.clone()), v);
        let bytes = encode_json(&json).unwrap();
        prop_assert_eq!(decode_json(&bytes), Ok(json));
    }
}
