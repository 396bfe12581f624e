use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

use crate::error::RecordError;
use crate::record::Record;
use crate::value::OtherValue;

// ─── Opaque-type codec registry ─────────────────────────────────────────────

/// Decoder for one registered opaque type.
pub type OtherDecodeFn = fn(&[u8]) -> Result<Arc<dyn OtherValue>, RecordError>;

/// Process-wide decoder table, keyed by `OtherValue::type_name`.
/// Nested records are registered up front so they always round-trip.
static OTHER_CODECS: Lazy<RwLock<FxHashMap<&'static str, OtherDecodeFn>>> = Lazy::new(|| {
    let mut codecs = FxHashMap::default();
    codecs.insert(Record::TYPE_NAME, decode_nested_record as OtherDecodeFn);
    RwLock::new(codecs)
});

fn decode_nested_record(data: &[u8]) -> Result<Arc<dyn OtherValue>, RecordError> {
    crate::deserialization::deserialize(data).map(|record| Arc::new(record) as Arc<dyn OtherValue>)
}

/// Register a decoder for an opaque type name.
///
/// Registration is idempotent: when the name is already taken the existing
/// decoder is kept and `false` is returned, so repeated registration from
/// independent call sites cannot race each other into different codecs.
pub fn register_other(type_name: &'static str, decode: OtherDecodeFn) -> bool {
    let mut guard = match OTHER_CODECS.write() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("codec registry write lock was poisoned, recovering");
            poisoned.into_inner()
        }
    };
    if guard.contains_key(type_name) {
        return false;
    }
    guard.insert(type_name, decode);
    tracing::debug!(type_name, "registered opaque value codec");
    true
}

/// All registered type names, sorted.
pub fn registered_other_types() -> Vec<&'static str> {
    let guard = match OTHER_CODECS.read() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("codec registry read lock was poisoned, recovering");
            poisoned.into_inner()
        }
    };
    let mut names: Vec<_> = guard.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Encode-side check: refuses to emit an opaque value nobody can decode.
pub(crate) fn is_registered(type_name: &str) -> bool {
    let guard = match OTHER_CODECS.read() {
        Ok(g) => g,
        Err(poisoned) => {
            tracing::warn!("codec registry read lock was poisoned, recovering");
            poisoned.into_inner()
        }
    };
    guard.contains_key(type_name)
}

pub(crate) fn decode_other(
    type_name: &str,
    data: &[u8],
) -> Result<Arc<dyn OtherValue>, RecordError> {
    let decode = {
        let guard = match OTHER_CODECS.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("codec registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.get(type_name).copied()
    };
    match decode {
        Some(decode) => decode(data),
        None => Err(RecordError::UnknownOtherType(type_name.to_string())),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
