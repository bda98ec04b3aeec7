//! Form snapshots and change detection
//!
//! A snapshot is a point-in-time capture of every editable field in the
//! form. Two snapshots are equal iff their canonical serializations are
//! equal, so change detection reduces to a string comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A point-in-time capture of the edit form's field values.
///
/// Field order is canonical (sorted by field name) so that serialization is
/// stable regardless of capture order. Immutable once captured; superseded
/// by the next capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    fields: BTreeMap<String, String>,
}

impl FormSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from (name, value) pairs
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set a single field value (builder-style, used by capture code)
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Field values in canonical (sorted) order, for form-encoding
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Canonical serialized form with stable key ordering.
    ///
    /// BTreeMap iteration order is the sort order of the keys, so the JSON
    /// produced here is deterministic for equal field sets.
    pub fn canonical(&self) -> String {
        // Serializing a map of strings cannot fail
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

/// Detects whether the form content changed since the previous capture.
///
/// Holds the canonical serialization of the last seen snapshot. Every call
/// to [`has_changed`](Self::has_changed) advances the stored reference,
/// regardless of the verdict, so a change is only ever reported once.
#[derive(Debug, Default)]
pub struct SnapshotComparator {
    /// Canonical form of the reference snapshot
    last: Option<String>,
}

impl SnapshotComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the comparator with an initial snapshot without reporting a
    /// change. Used at panel initialization.
    pub fn seed(&mut self, snapshot: &FormSnapshot) {
        self.last = Some(snapshot.canonical());
    }

    /// Compare `snapshot` against the stored reference and advance the
    /// reference to `snapshot`.
    ///
    /// Returns `true` iff the canonical serializations differ. The very
    /// first call on an unseeded comparator reports a change.
    pub fn has_changed(&mut self, snapshot: &FormSnapshot) -> bool {
        let canonical = snapshot.canonical();
        let changed = self.last.as_deref() != Some(canonical.as_str());
        self.last = Some(canonical);
        changed
    }
}
