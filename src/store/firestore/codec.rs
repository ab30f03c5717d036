// Firestore REST typed-value encoding

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value as Json};

use crate::store::value::{format_timestamp, Fields, Value};

pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Boolean(b) => json!({ "booleanValue": b }),
        // int64 travels as a decimal string
        Value::Integer(i) => json!({ "integerValue": i.to_string() }),
        Value::Double(d) => {
            if d.is_finite() {
                json!({ "doubleValue": d })
            } else if d.is_nan() {
                json!({ "doubleValue": "NaN" })
            } else if d.is_sign_positive() {
                json!({ "doubleValue": "Infinity" })
            } else {
                json!({ "doubleValue": "-Infinity" })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Timestamp(ts) => json!({ "timestampValue": format_timestamp(ts) }),
        Value::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Json> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

pub fn decode_value(wire: &Json) -> Result<Value, String> {
    let object = wire
        .as_object()
        .ok_or_else(|| format!("expected a typed value object, got {}", wire))?;
    let (kind, inner) = match (object.len(), object.iter().next()) {
        (1, Some(entry)) => entry,
        _ => return Err(format!("typed value must have exactly one key: {}", wire)),
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| format!("invalid booleanValue: {}", inner)),
        "integerValue" => decode_integer(inner).map(Value::Integer),
        "doubleValue" => decode_double(inner).map(Value::Double),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| format!("invalid {}: {}", kind, inner)),
        "timestampValue" => {
            let raw = inner
                .as_str()
                .ok_or_else(|| format!("invalid timestampValue: {}", inner))?;
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|e| format!("invalid timestampValue '{}': {}", raw, e))
        }
        "arrayValue" => {
            let values = match inner.get("values") {
                None | Some(Json::Null) => return Ok(Value::Array(Vec::new())),
                Some(values) => values
                    .as_array()
                    .ok_or_else(|| format!("invalid arrayValue: {}", inner))?,
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            None | Some(Json::Null) => Ok(Value::Map(Fields::new())),
            Some(Json::Object(fields)) => decode_fields(fields).map(Value::Map),
            Some(other) => Err(format!("invalid mapValue fields: {}", other)),
        },
        "geoPointValue" => {
            let mut point = Fields::new();
            for axis in ["latitude", "longitude"] {
                let coordinate = inner.get(axis).and_then(Json::as_f64).unwrap_or(0.0);
                point.insert(axis.to_string(), Value::Double(coordinate));
            }
            Ok(Value::Map(point))
        }
        other => Err(format!("unsupported value kind '{}'", other)),
    }
}

pub fn decode_fields(wire: &Map<String, Json>) -> Result<Fields, String> {
    wire.iter()
        .map(|(name, value)| {
            decode_value(value)
                .map(|v| (name.clone(), v))
                .map_err(|e| format!("field '{}': {}", name, e))
        })
        .collect()
}

fn decode_integer(inner: &Json) -> Result<i64, String> {
    match inner {
        Json::String(s) => s
            .parse::<i64>()
            .map_err(|e| format!("invalid integerValue '{}': {}", s, e)),
        Json::Number(n) => n
            .as_i64()
            .ok_or_else(|| format!("invalid integerValue: {}", n)),
        other => Err(format!("invalid integerValue: {}", other)),
    }
}

fn decode_double(inner: &Json) -> Result<f64, String> {
    match inner {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("invalid doubleValue: {}", n)),
        Json::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(format!("invalid doubleValue '{}'", s)),
        },
        other => Err(format!("invalid doubleValue: {}", other)),
    }
}

/// Quotes a field name for use in an update mask. Simple identifiers pass
/// through, anything else is wrapped in backticks.
pub fn quote_field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if simple {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_user_shaped_fields() {
        let ts = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let mut fields = Fields::new();
        fields.insert("gradYear".to_string(), Value::Integer(2027));
        fields.insert("programme".to_string(), Value::Null);
        fields.insert("stamps".to_string(), Value::from(vec!["library"]));
        fields.insert("createdAt".to_string(), Value::Timestamp(ts));

        let wire = Json::Object(encode_fields(&fields));
        assert_eq!(
            wire,
            json!({
                "gradYear": { "integerValue": "2027" },
                "programme": { "nullValue": null },
                "stamps": { "arrayValue": { "values": [ { "stringValue": "library" } ] } },
                "createdAt": { "timestampValue": "2025-09-01T08:00:00Z" }
            })
        );
    }

    #[test]
    fn test_decode_empty_array_and_map() {
        assert_eq!(decode_value(&json!({ "arrayValue": {} })).unwrap(), Value::Array(vec![]));
        assert_eq!(decode_value(&json!({ "mapValue": {} })).unwrap(), Value::Map(Fields::new()));
    }

    #[test]
    fn test_decode_timestamp_with_nanos_and_offset() {
        let value = decode_value(&json!({ "timestampValue": "2025-09-01T16:00:00.123456Z" })).unwrap();
        match value {
            Value::Timestamp(ts) => assert_eq!(ts.timestamp_subsec_micros(), 123456),
            other => panic!("expected timestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_integer_accepts_string_and_number() {
        assert_eq!(decode_value(&json!({ "integerValue": "-7" })).unwrap(), Value::Integer(-7));
        assert_eq!(decode_value(&json!({ "integerValue": 42 })).unwrap(), Value::Integer(42));
        assert!(decode_value(&json!({ "integerValue": "x" })).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_or_ambiguous_values() {
        assert!(decode_value(&json!({ "fancyValue": 1 })).is_err());
        assert!(decode_value(&json!({ "stringValue": "a", "booleanValue": true })).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn test_decode_fields_reports_field_name() {
        let wire = json!({ "stamps": { "arrayValue": { "values": "nope" } } });
        let err = decode_fields(wire.as_object().unwrap()).unwrap_err();
        assert!(err.starts_with("field 'stamps'"));
    }

    #[test]
    fn test_non_finite_doubles_use_string_form() {
        assert_eq!(encode_value(&Value::Double(f64::INFINITY)), json!({ "doubleValue": "Infinity" }));
        assert!(matches!(
            decode_value(&json!({ "doubleValue": "NaN" })).unwrap(),
            Value::Double(d) if d.is_nan()
        ));
    }

    #[test]
    fn test_quote_field_path() {
        assert_eq!(quote_field_path("gradYear"), "gradYear");
        assert_eq!(quote_field_path("_private1"), "_private1");
        assert_eq!(quote_field_path("1st"), "`1st`");
        assert_eq!(quote_field_path("a.b"), "`a.b`");
        assert_eq!(quote_field_path("we`ird"), "`we\\`ird`");
    }
}
