pub mod diff_op;
pub mod record;
pub mod set_op;

pub use diff_op::{changes, sub_of};
pub use record::{FieldMap, Record, RecordSet, RenameMap};
pub use set_op::{
    dedup_strs, dedup_values, field_kinds, find_where, intersection, pluck, records_not_in,
    without, without_strs,
};
