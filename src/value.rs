use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use smol_str::SmolStr;
use std::any::Any;
use std::sync::Arc;

use crate::error::RecordError;

// ─── Number ─────────────────────────────────────────────────────────────────

/// Numeric field value. Width and signedness are part of the identity:
/// `I32(5)` and `I64(5)` are different values and never compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    pub fn type_name(self) -> &'static str {
        match self {
            Number::I32(_) => "int32",
            Number::I64(_) => "int64",
            Number::U32(_) => "uint32",
            Number::U64(_) => "uint64",
            Number::F32(_) => "float32",
            Number::F64(_) => "float64",
        }
    }
}

// ─── FieldKind ──────────────────────────────────────────────────────────────

/// Coarse kind bucket reported by `field_kinds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    Date,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FieldKind::Str => "STR",
            FieldKind::Int => "INT",
            FieldKind::Float => "FLOAT",
            FieldKind::Date => "DATE",
        })
    }
}

// ─── OtherValue ─────────────────────────────────────────────────────────────

/// Capability trait for opaque values stored in a record.
///
/// A record field can hold any `'static` type behind `Value::Other` as long as
/// it can answer structural equality. Binary and JSON forms are opt-in: a type
/// that never travels through the codec only needs the three required methods.
pub trait OtherValue: std::fmt::Debug + Send + Sync + 'static {
    /// Stable name identifying the concrete type across the codec boundary.
    /// Must be unique per type; dotted namespacing ("myapp.geo_point") keeps
    /// independent registrations from colliding.
    fn type_name(&self) -> &'static str;

    /// Deep structural equality. Implementations downcast via `as_any`:
    ///
    /// ```ignore
    /// fn struct_eq(&self, other: &dyn OtherValue) -> bool {
    ///     other.as_any().downcast_ref::<Self>().is_some_and(|o| self == o)
    /// }
    /// ```
    fn struct_eq(&self, other: &dyn OtherValue) -> bool;

    fn as_any(&self) -> &dyn Any;

    /// Binary form for the codec. Implement together with a decoder
    /// registered under `type_name` to make the type serializable.
    fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Err(RecordError::UnregisteredOther(self.type_name().to_string()))
    }

    /// Diagnostic JSON used by the pretty renderer.
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::String(format!("{self:?}"))
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// Dynamically typed field value. The union is closed: every operation in the
/// crate matches exhaustively over these kinds.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Str(SmolStr),
    Bytes(Bytes),
    Number(Number),
    Time(DateTime<FixedOffset>),
    Other(Arc<dyn OtherValue>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// The one equality rule every operation in the crate goes through.
///
/// - `Null == Null`; null never equals a non-null value.
/// - Different kinds never compare equal, including different numeric
///   widths at equal magnitude (`I32(5) != I64(5)`).
/// - `Time` compares the represented instant, not the offset notation.
/// - `Other` dispatches to `OtherValue::struct_eq`.
/// - Floats keep IEEE semantics: `NaN != NaN`, so a record containing NaN
///   never equals anything, itself included.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            // Clones share the allocation, so try pointer identity first.
            (Value::Other(a), Value::Other(b)) => {
                Arc::ptr_eq(a, b) || a.struct_eq(b.as_ref())
            }
            _ => false,
        }
    }
}

impl Value {
    /// Wrap an opaque value.
    pub fn other<T: OtherValue>(value: T) -> Self {
        Value::Other(Arc::new(value))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Number(Number::I32(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::I64(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Number(Number::U32(u)) => Some(*u),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(Number::U64(u)) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Number(Number::F32(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(Number::F64(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Value::Time(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_other(&self) -> Option<&dyn OtherValue> {
        match self {
            Value::Other(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Number(n) => n.type_name(),
            Value::Time(_) => "timestamp",
            Value::Other(o) => o.type_name(),
        }
    }

    /// Coarse kind bucket, `None` for `Null`.
    ///
    /// # Panics
    ///
    /// Opaque values have no kind bucket; classifying one is a hard stop,
    /// never a silent default.
    pub fn classify(&self) -> Option<FieldKind> {
        match self {
            Value::Null => None,
            Value::Str(_) | Value::Bytes(_) => Some(FieldKind::Str),
            Value::Number(Number::F32(_)) | Value::Number(Number::F64(_)) => {
                Some(FieldKind::Float)
            }
            Value::Number(_) => Some(FieldKind::Int),
            Value::Time(_) => Some(FieldKind::Date),
            Value::Other(o) => {
                unimplemented!("no field kind for opaque {:?} values", o.type_name())
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::I32(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(Number::U32(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::U64(n))
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(Number::F32(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self {
        Value::Str(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Time(ts)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Time(ts.fixed_offset())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
