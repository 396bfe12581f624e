use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

// ─── Wire Model ─────────────────────────────────────────────────────────────
//
// A record travels as a single CBOR map:
//
//   { field_name: { kind_tag: payload }, ... }
//
// Each value is wrapped in an externally tagged enum so the numeric width
// survives the trip: I32(5) and I64(5) stay distinct values instead of
// collapsing into one CBOR integer. Timestamps ride as RFC 3339 text with
// their offset. Opaque values carry their registered type name next to
// their own encoded bytes.

#[derive(Debug, Serialize, Deserialize)]
pub(crate) enum Wire {
    Null,
    Str(SmolStr),
    Bytes(Bytes),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Time(DateTime<FixedOffset>),
    Other { name: String, data: Bytes },
}

pub(crate) type WireRecord = BTreeMap<SmolStr, Wire>;
