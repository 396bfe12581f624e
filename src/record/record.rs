use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RecordError;
use crate::value::{Number, OtherValue, Value};

pub type FieldMap = BTreeMap<SmolStr, Value>;

/// Ordered sequence of records. Every subsequence-returning operation in
/// `set_op` preserves this order.
pub type RecordSet = Vec<Record>;

/// Field rename mapping for `Record::rename_fields`: old name → new name.
pub type RenameMap = FxHashMap<SmolStr, SmolStr>;

// ─── Record ─────────────────────────────────────────────────────────────────

/// String-keyed map of dynamically typed values.
///
/// Presence and explicit null are different states and both are load-bearing:
/// `{"a": null}` has the field "a", `{}` does not, and the diff and subset
/// operations treat the two differently.
///
/// `Clone` copies the field map but shares the values (strings, byte
/// payloads, and opaque values are reference-counted), so derived records
/// are cheap and never deep-copy payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: FieldMap,
}

impl Record {
    /// Type name nested records travel under in the codec registry.
    pub const TYPE_NAME: &'static str = "dynrow.record";

    #[inline]
    pub fn new() -> Self {
        Record::default()
    }

    #[inline]
    pub fn from_fields(fields: FieldMap) -> Self {
        Record { fields }
    }

    /// Zip field names with values into a record.
    pub fn from_keys_values(keys: &[&str], values: Vec<Value>) -> Result<Record, RecordError> {
        if keys.len() != values.len() {
            return Err(RecordError::LengthMismatch {
                expected: keys.len(),
                actual: values.len(),
            });
        }
        Ok(keys
            .iter()
            .zip(values)
            .map(|(&name, value)| (SmolStr::from(name), value))
            .collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Insert or overwrite a field, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Check if a field exists. Null counts as present.
    #[inline]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// True when every listed field is present.
    pub fn has_fields(&self, keys: &[&str]) -> bool {
        keys.iter().all(|&name| self.has_field(name))
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, SmolStr, Value> {
        self.fields.iter()
    }

    #[inline]
    pub fn as_map(&self) -> &FieldMap {
        &self.fields
    }

    #[inline]
    pub fn into_fields(self) -> FieldMap {
        self.fields
    }

    // ─── Projections ────────────────────────────────────────────────────────

    /// Whitelist projection. Requested fields that are absent are omitted
    /// from the result, never null-filled; use `values_by_keys` for
    /// positional placeholders.
    pub fn pick(&self, keys: &[&str]) -> Record {
        let mut out = Record::new();
        for &name in keys {
            if let Some(value) = self.get(name) {
                out.insert(name, value.clone());
            }
        }
        out
    }

    /// Blacklist projection. With no keys this is a plain clone.
    pub fn omit(&self, keys: &[&str]) -> Record {
        if keys.is_empty() {
            return self.clone();
        }
        let drop: FxHashSet<&str> = keys.iter().copied().collect();
        self.iter()
            .filter(|(name, _)| !drop.contains(name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Field names, sorted. `None` when the record has no fields.
    pub fn keys(&self) -> Option<Vec<SmolStr>> {
        if self.fields.is_empty() {
            return None;
        }
        Some(self.fields.keys().cloned().collect())
    }

    /// Field values in name order. `None` when the record has no fields.
    pub fn values(&self) -> Option<Vec<Value>> {
        if self.fields.is_empty() {
            return None;
        }
        Some(self.fields.values().cloned().collect())
    }

    /// Values positionally aligned with `keys`; a missing field yields a
    /// `Value::Null` placeholder so the output length always matches.
    pub fn values_by_keys(&self, keys: &[&str]) -> Vec<Value> {
        keys.iter()
            .map(|&name| self.get(name).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Projection plus rename: only fields named in the mapping survive,
    /// under their new names. An empty mapping is a plain clone.
    pub fn rename_fields(&self, renames: &RenameMap) -> Record {
        if renames.is_empty() {
            return self.clone();
        }
        let mut out = Record::new();
        for (from, to) in renames {
            if let Some(value) = self.get(from.as_str()) {
                out.insert(to.clone(), value.clone());
            }
        }
        out
    }

    pub fn uppercase_keys(&self) -> Record {
        self.iter()
            .map(|(name, value)| (SmolStr::from(name.to_uppercase()), value.clone()))
            .collect()
    }

    // ─── In-place operations ────────────────────────────────────────────────

    /// Copy every field of `other` into self, overwriting on collision.
    pub fn merge(&mut self, other: &Record) {
        for (name, value) in other.iter() {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Drop every null-valued field, in place.
    pub fn prune_nulls(&mut self) {
        self.fields.retain(|_, value| !value.is_null());
    }

    /// Rewrite fields whose values lose fidelity in JavaScript-facing JSON:
    /// 64-bit integers become decimal strings, timestamps RFC 3339 strings.
    /// 32-bit integers and floats are left alone.
    pub fn make_json_safe(&mut self) {
        for value in self.fields.values_mut() {
            let replacement = match &*value {
                Value::Number(Number::I64(i)) => Some(SmolStr::from(i.to_string())),
                Value::Number(Number::U64(u)) => Some(SmolStr::from(u.to_string())),
                Value::Time(ts) => Some(SmolStr::from(ts.to_rfc3339())),
                _ => None,
            };
            if let Some(s) = replacement {
                *value = Value::Str(s);
            }
        }
    }
}

// ─── Iterator plumbing ──────────────────────────────────────────────────────

impl FromIterator<(SmolStr, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (SmolStr, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Extend<(SmolStr, Value)> for Record {
    fn extend<I: IntoIterator<Item = (SmolStr, Value)>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}

impl IntoIterator for Record {
    type Item = (SmolStr, Value);
    type IntoIter = std::collections::btree_map::IntoIter<SmolStr, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a SmolStr, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, SmolStr, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// ─── Nesting ────────────────────────────────────────────────────────────────

/// A record can itself be a field value; equality recurses field-wise and
/// the codec registry knows how to decode it from the start.
impl OtherValue for Record {
    fn type_name(&self) -> &'static str {
        Record::TYPE_NAME
    }

    fn struct_eq(&self, other: &dyn OtherValue) -> bool {
        other.as_any().downcast_ref::<Self>().is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        crate::serialization::serialize(self)
    }

    fn to_json(&self) -> serde_json::Value {
        Record::to_json(self)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Other(Arc::new(record))
    }
}

// ─── Literal construction ───────────────────────────────────────────────────

#[macro_export]
macro_rules! record {
    // Leerer Record
    () => {
        $crate::Record::new()
    };

    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut rec = $crate::Record::new();
        $(
            rec.insert($key, $val);
        )+
        rec
    }};
}
