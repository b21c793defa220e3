//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore REST documents wrap every value in a single-key object naming
//! its type, e.g. `{"integerValue": "42"}` or
//! `{"mapValue": {"fields": {...}}}`. Integers travel as strings.

use serde_json::{json, Map, Value};

use super::store::StoreError;

/// Encode a JSON value as a Firestore value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            if values.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a JSON object as a Firestore `fields` map
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// Decode a Firestore value into plain JSON
///
/// Timestamps, references and bytes decode to their string form; geo
/// points decode to `{latitude, longitude}`.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidResponse(format!("value is not an object: {}", value)))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::InvalidResponse("empty value object".into()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(Value::Bool(inner.as_bool().unwrap_or(false))),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::InvalidResponse(format!("bad integerValue: {}", inner)))
        }
        "doubleValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => {
            let values = match inner.get("values").and_then(|v| v.as_array()) {
                Some(values) => values.iter().map(decode_value).collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner.get("fields").cloned().unwrap_or_else(|| json!({}));
            Ok(Value::Object(decode_fields(&fields)?))
        }
        other => Err(StoreError::InvalidResponse(format!("unsupported value type: {}", other))),
    }
}

/// Decode a Firestore `fields` map into a JSON object
pub fn decode_fields(fields: &Value) -> Result<Map<String, Value>, StoreError> {
    let Some(fields) = fields.as_object() else {
        return Ok(Map::new());
    };
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

/// Nest a value under a dotted field path: `a.b` -> `{"a": {"b": v}}`
pub fn insert_at_path(fields: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            fields.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = fields
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_at_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_profile_fields() {
        let encoded = encode_value(&json!({
            "tokens": 12,
            "is_diabetic": false,
            "rating": 4.5,
            "rewards": [],
        }));

        let fields = &encoded["mapValue"]["fields"];
        assert_eq!(fields["tokens"], json!({"integerValue": "12"}));
        assert_eq!(fields["is_diabetic"], json!({"booleanValue": false}));
        assert_eq!(fields["rating"], json!({"doubleValue": 4.5}));
        assert_eq!(fields["rewards"], json!({"arrayValue": {}}));
    }

    #[test]
    fn test_decode_nested_document() {
        let fields = json!({
            "name": {"stringValue": "Reef House"},
            "rooms": {"integerValue": "120"},
            "amenities": {"arrayValue": {"values": [{"stringValue": "Pool"}]}},
            "opened": {"timestampValue": "2024-05-01T00:00:00Z"},
            "contact": {"mapValue": {"fields": {"phone": {"nullValue": null}}}},
            "empty": {"mapValue": {}},
        });

        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["rooms"], json!(120));
        assert_eq!(decoded["amenities"], json!(["Pool"]));
        assert_eq!(decoded["opened"], json!("2024-05-01T00:00:00Z"));
        assert_eq!(decoded["contact"], json!({"phone": null}));
        assert_eq!(decoded["empty"], json!({}));
    }

    #[test]
    fn test_decode_rejects_bad_integer() {
        assert!(decode_value(&json!({"integerValue": "twelve"})).is_err());
    }

    #[test]
    fn test_insert_at_path() {
        let mut fields = Map::new();
        insert_at_path(&mut fields, "preferences.preferred_locations", json!(["rome"]));
        insert_at_path(&mut fields, "preferences.amenities_of_interest", json!(["spa"]));
        insert_at_path(&mut fields, "is_diabetic", json!(true));

        assert_eq!(
            Value::Object(fields),
            json!({
                "preferences": {"preferred_locations": ["rome"], "amenities_of_interest": ["spa"]},
                "is_diabetic": true,
            })
        );
    }
}
