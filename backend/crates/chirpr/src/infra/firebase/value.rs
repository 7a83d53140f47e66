//! Firestore typed-value JSON codec
//!
//! Firestore's REST surface wraps every value in a single-key object naming
//! its type (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...).
//! 64-bit integers travel as decimal strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use crate::domain::document::{FieldValue, Fields};
use crate::domain::service::StoreError;

/// Encoded fields plus the top-level fields to stamp with the request time
#[derive(Debug, Default)]
pub struct EncodedFields {
    pub fields: Map<String, Value>,
    pub server_timestamps: Vec<String>,
}

pub fn encode_fields(fields: &Fields) -> EncodedFields {
    let mut encoded = EncodedFields::default();
    for (name, value) in fields {
        if matches!(value, FieldValue::ServerTimestamp) {
            encoded.server_timestamps.push(name.clone());
        } else {
            encoded.fields.insert(name.clone(), encode_value(value));
        }
    }
    encoded
}

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        FieldValue::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(fields) => {
            let fields: Map<String, Value> = fields
                .iter()
                .map(|(name, value)| (name.clone(), encode_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
        // Transforms only apply to top-level fields
        FieldValue::ServerTimestamp => {
            tracing::warn!("Nested server timestamp written as null");
            json!({ "nullValue": null })
        }
    }
}

/// Decode a document's `fields` member; an absent member is an empty document
pub fn decode_fields(fields: Option<&Value>) -> Result<Fields, StoreError> {
    match fields {
        None | Some(Value::Null) => Ok(Fields::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| decode_value(value).map(|value| (name.clone(), value)))
            .collect(),
        Some(other) => Err(decode_error(format!("`fields` is not an object: {other}"))),
    }
}

pub fn decode_value(value: &Value) -> Result<FieldValue, StoreError> {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Err(decode_error(format!("not a typed value: {value}")));
    };

    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| decode_error(format!("bad booleanValue: {inner}"))),
        "integerValue" => decode_integer(inner).map(FieldValue::Integer),
        "doubleValue" => decode_double(inner).map(FieldValue::Double),
        "stringValue" | "referenceValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(|| decode_error(format!("bad {kind}: {inner}"))),
        "timestampValue" => {
            let raw = inner
                .as_str()
                .ok_or_else(|| decode_error(format!("bad timestampValue: {inner}")))?;
            DateTime::parse_from_rfc3339(raw)
                .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
                .map_err(|e| decode_error(format!("bad timestampValue {raw:?}: {e}")))
        }
        "arrayValue" => match inner.get("values") {
            None | Some(Value::Null) => Ok(FieldValue::Array(Vec::new())),
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Array),
            Some(other) => Err(decode_error(format!("bad arrayValue: {other}"))),
        },
        "mapValue" => decode_fields(inner.get("fields")).map(FieldValue::Map),
        other => Err(decode_error(format!("unsupported value type `{other}`"))),
    }
}

fn decode_integer(inner: &Value) -> Result<i64, StoreError> {
    match inner {
        Value::String(s) => s
            .parse()
            .map_err(|_| decode_error(format!("bad integerValue: {s:?}"))),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| decode_error(format!("bad integerValue: {n}"))),
        other => Err(decode_error(format!("bad integerValue: {other}"))),
    }
}

fn decode_double(inner: &Value) -> Result<f64, StoreError> {
    match inner {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| decode_error(format!("bad doubleValue: {n}"))),
        // NaN and the infinities arrive as strings
        Value::String(s) => s
            .parse()
            .map_err(|_| decode_error(format!("bad doubleValue: {s:?}"))),
        other => Err(decode_error(format!("bad doubleValue: {other}"))),
    }
}

fn decode_error(message: String) -> StoreError {
    StoreError::Decode(message)
}
