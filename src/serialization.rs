use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;

use crate::error::RecordError;
use crate::record::Record;
use crate::registry;
use crate::value::{Number, Value};
use crate::wire::{Wire, WireRecord};

// ─── Binary encode ──────────────────────────────────────────────────────────

/// Encode a record into a fresh CBOR buffer.
pub fn serialize(record: &Record) -> Result<Vec<u8>, RecordError> {
    // Rough capacity estimate; CBOR map overhead is small.
    let mut buf = Vec::with_capacity(32 + record.len() * 24);
    serialize_into(record, &mut buf)?;
    Ok(buf)
}

/// Encode a record into a reusable buffer.
///
/// Identical to `serialize`, but reuses the caller's Vec to eliminate
/// allocations when encoding many records in sequence. The buffer is
/// cleared but retains its capacity.
pub fn serialize_into(record: &Record, buf: &mut Vec<u8>) -> Result<(), RecordError> {
    let wire = to_wire(record)?;
    buf.clear();
    ciborium::into_writer(&wire, &mut *buf).map_err(|e| RecordError::Encode(e.to_string()))?;
    tracing::trace!(fields = record.len(), bytes = buf.len(), "encoded record");
    Ok(())
}

fn to_wire(record: &Record) -> Result<WireRecord, RecordError> {
    record
        .iter()
        .map(|(name, value)| Ok((name.clone(), wire_value(value)?)))
        .collect()
}

fn wire_value(value: &Value) -> Result<Wire, RecordError> {
    Ok(match value {
        Value::Null => Wire::Null,
        Value::Str(s) => Wire::Str(s.clone()),
        Value::Bytes(b) => Wire::Bytes(b.clone()),
        Value::Number(n) => match n {
            Number::I32(i) => Wire::I32(*i),
            Number::I64(i) => Wire::I64(*i),
            Number::U32(u) => Wire::U32(*u),
            Number::U64(u) => Wire::U64(*u),
            Number::F32(f) => Wire::F32(*f),
            Number::F64(f) => Wire::F64(*f),
        },
        Value::Time(ts) => Wire::Time(*ts),
        Value::Other(o) => {
            let name = o.type_name();
            // Refuse at encode time, not decode time, so the error names the
            // process that forgot to register.
            if !registry::is_registered(name) {
                return Err(RecordError::UnregisteredOther(name.to_string()));
            }
            Wire::Other {
                name: name.to_string(),
                data: Bytes::from(o.to_bytes()?),
            }
        }
    })
}

impl Record {
    /// Encode this record into a fresh CBOR buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        serialize(self)
    }
}

// ─── JSON rendering ─────────────────────────────────────────────────────────

impl Record {
    /// Render as a `serde_json::Value` object, field names sorted.
    ///
    /// Bytes become base64 text, timestamps RFC 3339 text, opaque values
    /// whatever their `to_json` hook reports.
    ///
    /// # Panics
    ///
    /// Non-finite floats have no JSON form and abort the rendering.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value_to_json(value)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Indented JSON rendering for logs and diagnostics. Not guaranteed to
    /// parse back into an equal record; use `to_bytes` for that.
    ///
    /// # Panics
    ///
    /// Same contract as `to_json`: non-finite floats abort.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).expect("JSON rendering failed")
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty())
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
        Value::Number(n) => match n {
            Number::I32(i) => serde_json::Value::from(*i),
            Number::I64(i) => serde_json::Value::from(*i),
            Number::U32(u) => serde_json::Value::from(*u),
            Number::U64(u) => serde_json::Value::from(*u),
            Number::F32(f) => float_to_json(f64::from(*f)),
            Number::F64(f) => float_to_json(*f),
        },
        Value::Time(ts) => serde_json::Value::String(ts.to_rfc3339()),
        Value::Other(o) => o.to_json(),
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    match serde_json::Number::from_f64(f) {
        Some(n) => serde_json::Value::Number(n),
        None => panic!("cannot render non-finite float {f} as JSON"),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::record;

    #[test]
    fn test_pretty_renders_sorted_fields() {
        let rec = record! {
            "name" => "Alice",
            "age" => 28i64,
            "score" => 99.5f64,
        };
        let rendered = rec.pretty();
        let expected = "{\n  \"age\": 28,\n  \"name\": \"Alice\",\n  \"score\": 99.5\n}";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_pretty_bytes_and_time() {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:30:00+02:00").unwrap();
        let rec = record! {
            "payload" => vec![1u8, 2, 3],
            "created_at" => ts,
        };
        let json = rec.to_json();
        assert_eq!(json["payload"], serde_json::json!("AQID"));
        assert_eq!(json["created_at"], serde_json::json!("2024-01-15T10:30:00+02:00"));
    }

    #[test]
    fn test_display_matches_pretty() {
        let rec = record! { "a" => 1i64 };
        assert_eq!(format!("{rec}"), rec.pretty());
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_pretty_panics_on_nan() {
        let rec = record! { "bad" => f64::NAN };
        let _ = rec.pretty();
    }
}
