use super::record::Record;

// ─── Change diff & containment ──────────────────────────────────────────────

impl Record {
    /// Forward patch from `before` to self.
    ///
    /// Starts from a clone of self and drops every field that is not a real
    /// change: a field equal to its `before` value, or a field that is null
    /// here and absent in `before` (appearing as null is not a change).
    /// Fields that exist only in `before` are never reported; the patch only
    /// says what to write, not what disappeared.
    pub fn changes_since(&self, before: &Record) -> Record {
        self.iter()
            .filter(|(name, value)| match before.get(name.as_str()) {
                Some(prev) => prev != *value,
                None => !value.is_null(),
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// True when every field of `candidate` is accounted for here: present
    /// with an equal value, or null in `candidate` and absent here.
    ///
    /// Note the asymmetry of null: a null candidate field matches both "held
    /// as null" and "not held at all", but a non-null candidate field must
    /// be present.
    pub fn covers(&self, candidate: &Record) -> bool {
        candidate
            .iter()
            .all(|(name, value)| match self.get(name.as_str()) {
                Some(held) => held == value,
                None => value.is_null(),
            })
    }
}

/// Diff two optional snapshots. `None` when either side is absent, since a
/// patch against a missing snapshot has no meaning.
pub fn changes(before: Option<&Record>, after: Option<&Record>) -> Option<Record> {
    Some(after?.changes_since(before?))
}

/// Containment test against an optional container. An absent container
/// covers only an empty candidate.
pub fn sub_of(container: Option<&Record>, candidate: &Record) -> bool {
    match container {
        Some(container) => container.covers(candidate),
        None => candidate.is_empty(),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
