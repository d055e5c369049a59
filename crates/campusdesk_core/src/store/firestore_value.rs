//! JSON <-> Firestore typed value codec.
//!
//! Firestore's REST surface wraps every value in a one-key object naming its
//! type (`{"stringValue": "x"}`). Integers travel as decimal strings.

use crate::store::{Fields, StoreError, StoreResult};
use serde_json::{json, Map, Value};

/// Encodes one JSON value as a Firestore typed value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => match number.as_i64() {
            Some(int) => json!({ "integerValue": int.to_string() }),
            None => json!({ "doubleValue": number.as_f64().unwrap_or_default() }),
        },
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Encodes a document body into the Firestore `fields` object.
pub fn encode_fields(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect();
    Value::Object(encoded)
}

/// Decodes a Firestore `fields` object; a missing object decodes as empty.
pub fn decode_fields(fields: Option<&Value>) -> StoreResult<Fields> {
    let Some(fields) = fields else {
        return Ok(Fields::new());
    };
    let object = fields
        .as_object()
        .ok_or_else(|| StoreError::Codec("document `fields` is not an object".to_string()))?;

    object
        .iter()
        .map(|(key, value)| -> StoreResult<(String, Value)> {
            Ok((key.clone(), decode_value(value)?))
        })
        .collect()
}

/// Decodes one Firestore typed value.
pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let object = value
        .as_object()
        .filter(|object| object.len() == 1)
        .ok_or_else(|| StoreError::Codec(format!("malformed typed value: {value}")))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| StoreError::Codec("empty typed value".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| codec_error(kind, inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(text) => text.parse::<i64>().ok(),
                Value::Number(number) => number.as_i64(),
                _ => None,
            };
            parsed.map(Value::from).ok_or_else(|| codec_error(kind, inner))
        }
        "doubleValue" => inner
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| codec_error(kind, inner)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(|| codec_error(kind, inner)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<StoreResult<Vec<_>>>()?,
                Some(other) => return Err(codec_error(kind, other)),
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => Ok(Value::Object(decode_fields(inner.get("fields"))?)),
        other => Err(StoreError::Codec(format!("unsupported value type `{other}`"))),
    }
}

fn codec_error(kind: &str, inner: &Value) -> StoreError {
    StoreError::Codec(format!("invalid {kind} payload: {inner}"))
}
