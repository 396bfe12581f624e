use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::record::{Record, RecordSet};
use crate::value::{FieldKind, Value};

// ─── Projection-keyed set operations ────────────────────────────────────────
//
// Two rows are key-equal when their `pick` projections over the key list are
// equal records, including the presence/null distinction. Both sides are
// scanned pairwise; no index is built.

/// Rows present in both sets, keyed by the projection over `keys`.
///
/// Returns index-aligned sequences: position i of each output holds the
/// matching pair. A left row pairs with the first matching right row and
/// stops looking; right rows are not consumed and may pair with several
/// left rows. Either side empty yields two empty sets.
pub fn intersection(left: &[Record], right: &[Record], keys: &[&str]) -> (RecordSet, RecordSet) {
    if left.is_empty() || right.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let mut left_hits = Vec::new();
    let mut right_hits = Vec::new();
    for row in left {
        let key = row.pick(keys);
        if let Some(partner) = right.iter().find(|other| other.pick(keys) == key) {
            left_hits.push(row.clone());
            right_hits.push(partner.clone());
        }
    }
    (left_hits, right_hits)
}

/// One-sided minus: rows of `src` whose key projection appears nowhere in
/// `dest`. Not a symmetric difference. An empty `dest` keeps all of `src`.
pub fn records_not_in(src: &[Record], dest: &[Record], keys: &[&str]) -> RecordSet {
    if src.is_empty() {
        return Vec::new();
    }
    if dest.is_empty() {
        return src.to_vec();
    }
    src.iter()
        .filter(|row| {
            let key = row.pick(keys);
            !dest.iter().any(|other| other.pick(keys) == key)
        })
        .cloned()
        .collect()
}

// ─── Row scans ──────────────────────────────────────────────────────────────

/// The value of `name` from each row that has the field. Rows without the
/// field contribute nothing; rows holding null contribute the null.
pub fn pluck(rows: &[Record], name: &str) -> Vec<Value> {
    rows.iter().filter_map(|row| row.get(name).cloned()).collect()
}

/// First row matching every criteria field by value equality. A row lacking
/// a criteria field never matches, even against null. Empty criteria match
/// the first row.
pub fn find_where<'a>(rows: &'a [Record], criteria: &Record) -> Option<&'a Record> {
    rows.iter().find(|row| {
        criteria
            .iter()
            .all(|(name, wanted)| row.get(name.as_str()).is_some_and(|held| held == wanted))
    })
}

/// Coarse kind per requested field, scanned across rows until the first
/// non-null occurrence decides. Fields that never occur non-null stay `None`.
///
/// # Panics
///
/// Classifying an opaque value is a hard stop (see `Value::classify`).
pub fn field_kinds(rows: &[Record], keys: &[&str]) -> FxHashMap<SmolStr, Option<FieldKind>> {
    let mut kinds: FxHashMap<SmolStr, Option<FieldKind>> =
        keys.iter().map(|&name| (SmolStr::from(name), None)).collect();
    for row in rows {
        for &name in keys {
            let slot = match kinds.get_mut(name) {
                Some(slot) if slot.is_none() => slot,
                _ => continue,
            };
            if let Some(value) = row.get(name) {
                *slot = value.classify();
            }
        }
    }
    kinds
}

// ─── Sequence dedup / removal ───────────────────────────────────────────────

/// First-occurrence dedup by value equality, order preserved. NaN never
/// equals itself, so NaN entries all survive.
pub fn dedup_values(vals: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    for value in vals {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.clone());
        }
    }
    out
}

/// String variant of `dedup_values`.
pub fn dedup_strs(vals: &[SmolStr]) -> Vec<SmolStr> {
    let mut out: Vec<SmolStr> = Vec::new();
    for value in vals {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.clone());
        }
    }
    out
}

/// Drop every value that equals one of `remove`. Nothing to remove is a
/// plain copy.
pub fn without(vals: &[Value], remove: &[Value]) -> Vec<Value> {
    if remove.is_empty() {
        return vals.to_vec();
    }
    vals.iter()
        .filter(|value| !remove.iter().any(|r| r == *value))
        .cloned()
        .collect()
}

/// String variant of `without`.
pub fn without_strs(vals: &[SmolStr], remove: &[SmolStr]) -> Vec<SmolStr> {
    if remove.is_empty() {
        return vals.to_vec();
    }
    vals.iter()
        .filter(|value| !remove.contains(value))
        .cloned()
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn orders() -> Vec<Record> {
        vec![
            record! { "id" => 1i64, "item" => "apple", "qty" => 3i64 },
            record! { "id" => 2i64, "item" => "pear", "qty" => 1i64 },
            record! { "id" => 3i64, "item" => "apple", "qty" => 7i64 },
        ]
    }

    #[test]
    fn test_intersection_aligned_pairs() {
        let left = orders();
        let right = vec![
            record! { "id" => 3i64, "status" => "shipped" },
            record! { "id" => 1i64, "status" => "open" },
        ];
        let (l, r) = intersection(&left, &right, &["id"]);
        assert_eq!(l.len(), r.len());
        assert_eq!(l, vec![left[0].clone(), left[2].clone()]);
        assert_eq!(r, vec![right[1].clone(), right[0].clone()]);
    }

    #[test]
    fn test_intersection_first_match_wins() {
        let left = vec![record! { "k" => "a", "side" => "left" }];
        let right = vec![
            record! { "k" => "a", "n" => 1i64 },
            record! { "k" => "a", "n" => 2i64 },
        ];
        let (_, r) = intersection(&left, &right, &["k"]);
        assert_eq!(r, vec![right[0].clone()]);
    }

    #[test]
    fn test_intersection_right_not_consumed() {
        let left = vec![
            record! { "k" => "a", "n" => 1i64 },
            record! { "k" => "a", "n" => 2i64 },
        ];
        let right = vec![record! { "k" => "a" }];
        let (l, r) = intersection(&left, &right, &["k"]);
        assert_eq!(l.len(), 2);
        assert_eq!(r, vec![right[0].clone(), right[0].clone()]);
    }

    #[test]
    fn test_intersection_empty_side() {
        let rows = orders();
        assert_eq!(intersection(&rows, &[], &["id"]), (vec![], vec![]));
        assert_eq!(intersection(&[], &rows, &["id"]), (vec![], vec![]));
    }

    #[test]
    fn test_intersection_null_vs_absent_key() {
        use crate::value::Value;
        // A null key field and a missing key field project differently.
        let left = vec![record! { "k" => Value::Null }];
        let right = vec![record! { "other" => 1i64 }];
        let (l, _) = intersection(&left, &right, &["k"]);
        assert!(l.is_empty());
    }

    #[test]
    fn test_records_not_in() {
        let src = orders();
        let dest = vec![record! { "id" => 2i64 }];
        let out = records_not_in(&src, &dest, &["id"]);
        assert_eq!(out, vec![src[0].clone(), src[2].clone()]);
    }

    #[test]
    fn test_records_not_in_empty_edges() {
        let rows = orders();
        assert_eq!(records_not_in(&rows, &[], &["id"]), rows);
        assert!(records_not_in(&[], &rows, &["id"]).is_empty());
    }

    #[test]
    fn test_records_not_in_is_one_sided() {
        let src = vec![record! { "id" => 1i64 }];
        let dest = vec![record! { "id" => 1i64 }, record! { "id" => 99i64 }];
        // dest rows absent from src are not reported.
        assert!(records_not_in(&src, &dest, &["id"]).is_empty());
    }

    #[test]
    fn test_pluck_skips_absent_keeps_null() {
        use crate::value::Value;
        let rows = vec![
            record! { "v" => 1i64 },
            record! { "other" => 2i64 },
            record! { "v" => Value::Null },
        ];
        assert_eq!(pluck(&rows, "v"), vec![Value::from(1i64), Value::Null]);
    }

    #[test]
    fn test_find_where() {
        let rows = orders();
        let hit = find_where(&rows, &record! { "item" => "apple", "qty" => 7i64 });
        assert_eq!(hit, Some(&rows[2]));
        assert_eq!(find_where(&rows, &record! { "item" => "plum" }), None);
    }

    #[test]
    fn test_find_where_absent_field_never_matches() {
        use crate::value::Value;
        let rows = vec![record! { "a" => 1i64 }];
        assert_eq!(find_where(&rows, &record! { "b" => Value::Null }), None);
    }

    #[test]
    fn test_find_where_empty_criteria_matches_first() {
        let rows = orders();
        assert_eq!(find_where(&rows, &Record::new()), Some(&rows[0]));
    }

    #[test]
    fn test_dedup_values_first_occurrence_order() {
        let vals = vec![
            Value::from("a"),
            Value::from(1i64),
            Value::from("a"),
            Value::from(1i32),
            Value::from(1i64),
        ];
        // 1i32 and 1i64 are different values.
        assert_eq!(
            dedup_values(&vals),
            vec![Value::from("a"), Value::from(1i64), Value::from(1i32)]
        );
    }

    #[test]
    fn test_dedup_strs() {
        let vals: Vec<SmolStr> = ["b", "a", "b", "c", "a"].into_iter().map(SmolStr::from).collect();
        let expect: Vec<SmolStr> = ["b", "a", "c"].into_iter().map(SmolStr::from).collect();
        assert_eq!(dedup_strs(&vals), expect);
    }

    #[test]
    fn test_without() {
        let vals = vec![Value::from(1i64), Value::from("x"), Value::from(2i64)];
        assert_eq!(
            without(&vals, &[Value::from(1i64)]),
            vec![Value::from("x"), Value::from(2i64)]
        );
        assert_eq!(without(&vals, &[]), vals);
        // Width mismatch removes nothing.
        assert_eq!(without(&vals, &[Value::from(1i32)]), vals);
    }

    #[test]
    fn test_without_strs() {
        let vals: Vec<SmolStr> = ["a", "b", "c"].into_iter().map(SmolStr::from).collect();
        let remove: Vec<SmolStr> = ["b"].into_iter().map(SmolStr::from).collect();
        let expect: Vec<SmolStr> = ["a", "c"].into_iter().map(SmolStr::from).collect();
        assert_eq!(without_strs(&vals, &remove), expect);
    }

    #[test]
    fn test_field_kinds() {
        use crate::value::Value;
        let ts = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z").unwrap();
        let rows = vec![
            record! { "s" => Value::Null, "n" => 1u64, "f" => 0.5f64 },
            record! { "s" => "text", "d" => ts },
        ];
        let kinds = field_kinds(&rows, &["s", "n", "f", "d", "missing"]);
        assert_eq!(kinds["s"], Some(FieldKind::Str));
        assert_eq!(kinds["n"], Some(FieldKind::Int));
        assert_eq!(kinds["f"], Some(FieldKind::Float));
        assert_eq!(kinds["d"], Some(FieldKind::Date));
        // Requested but never seen non-null: reported as undetermined.
        assert_eq!(kinds["missing"], None);
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_field_kinds_first_non_null_decides() {
        let rows = vec![
            record! { "v" => 1i64 },
            record! { "v" => "later text" },
        ];
        let kinds = field_kinds(&rows, &["v"]);
        assert_eq!(kinds["v"], Some(FieldKind::Int));
    }

    #[test]
    #[should_panic]
    fn test_field_kinds_panics_on_opaque() {
        let nested = record! { "inner" => 1i64 };
        let rows = vec![record! { "o" => nested }];
        let _ = field_kinds(&rows, &["o"]);
    }
}
