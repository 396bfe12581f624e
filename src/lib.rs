//! Algebra over dynamically typed rows: diff two snapshots of a record,
//! test containment, reconcile row sets by a key projection, and move
//! records through a CBOR wire format that keeps numeric widths and
//! timestamp instants intact.
//!
//! The building blocks are [`Value`], a closed tagged union, and [`Record`],
//! a string-keyed map of values. Everything else is a pure function over
//! those two; the only process-wide state is the opaque-value codec
//! registry in [`registry`].

pub mod deserialization;
pub mod error;
pub mod record;
pub mod registry;
pub mod serialization;
pub mod value;
mod wire;

pub use deserialization::deserialize;
pub use error::RecordError;
pub use record::{
    FieldMap, Record, RecordSet, RenameMap, changes, dedup_strs, dedup_values, field_kinds,
    find_where, intersection, pluck, records_not_in, sub_of, without, without_strs,
};
pub use registry::{OtherDecodeFn, register_other, registered_other_types};
pub use serialization::{serialize, serialize_into};
pub use value::{FieldKind, Number, OtherValue, Value};
