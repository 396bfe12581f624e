use crate::error::RecordError;
use crate::record::{FieldMap, Record};
use crate::registry;
use crate::value::{Number, Value};
use crate::wire::{Wire, WireRecord};

// ─── Binary decode ──────────────────────────────────────────────────────────

/// Decode a CBOR buffer produced by `serialize`.
///
/// Malformed input is reported as an error, never as a partially decoded
/// record. Opaque values are raised through the codec registry.
pub fn deserialize(data: &[u8]) -> Result<Record, RecordError> {
    let wire: WireRecord =
        ciborium::from_reader(data).map_err(|e| RecordError::Decode(e.to_string()))?;
    let fields = wire
        .into_iter()
        .map(|(name, wire)| Ok((name, value_from_wire(wire)?)))
        .collect::<Result<FieldMap, RecordError>>()?;
    tracing::trace!(bytes = data.len(), fields = fields.len(), "decoded record");
    Ok(Record::from_fields(fields))
}

fn value_from_wire(wire: Wire) -> Result<Value, RecordError> {
    Ok(match wire {
        Wire::Null => Value::Null,
        Wire::Str(s) => Value::Str(s),
        Wire::Bytes(b) => Value::Bytes(b),
        Wire::I32(i) => Value::Number(Number::I32(i)),
        Wire::I64(i) => Value::Number(Number::I64(i)),
        Wire::U32(u) => Value::Number(Number::U32(u)),
        Wire::U64(u) => Value::Number(Number::U64(u)),
        Wire::F32(f) => Value::Number(Number::F32(f)),
        Wire::F64(f) => Value::Number(Number::F64(f)),
        Wire::Time(ts) => Value::Time(ts),
        Wire::Other { name, data } => Value::Other(registry::decode_other(&name, &data)?),
    })
}

impl Record {
    /// Decode a record from its binary form.
    pub fn from_bytes(data: &[u8]) -> Result<Record, RecordError> {
        deserialize(data)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
