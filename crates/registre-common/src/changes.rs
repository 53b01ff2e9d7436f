//! Field-level change capture
//!
//! Compares the stored state of a record with the fields a mutation applies and
//! keeps only the fields whose value actually moved. The resulting [`ChangeSet`]
//! is what the audit ledger stores under `details.changed`.
//!
//! Both sides are flat JSON objects. Iteration is driven by the keys of the new
//! state, so a field that only exists on the old side is never reported.
//! Temporal values are compared by their serialized form, which means two
//! timestamps for the same instant are equal.
//!
//! ```
//! use registre_common::changes::{capture_changes, FieldChange};
//! use serde_json::json;
//!
//! let old = json!({"status": "in_custody", "cell_number": "B-4"});
//! let new = json!({"status": "released", "cell_number": "B-4"});
//!
//! let changes = capture_changes(&old, &new);
//! assert_eq!(changes.len(), 1);
//! assert_eq!(
//!     changes.get("status"),
//!     Some(&FieldChange::new(Some(json!("in_custody")), json!("released")))
//! );
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{CommonError, Result};

/// One field that differs between two states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Previous value; `None` when the field did not exist before
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub old: Option<Value>,
    pub new: Value,
}

/// A key that is present, even as `null`, is `Some`; only a missing key is `None`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl FieldChange {
    pub fn new(old: Option<Value>, new: Value) -> Self {
        Self { old, new }
    }
}

/// Map of changed fields, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeMap<String, FieldChange>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, change: FieldChange) {
        self.0.insert(field.into(), change);
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, FieldChange);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Diff two flat objects
///
/// Every key of `new` whose value differs from the value at the same key of `old`
/// ends up in the result as `{old, new}`. A key absent from `old` is reported with
/// `old: None`. Non-object inputs are treated as empty objects.
pub fn capture_changes(old: &Value, new: &Value) -> ChangeSet {
    let empty = Map::new();
    let old = old.as_object().unwrap_or(&empty);
    let new = new.as_object().unwrap_or(&empty);
    capture_map_changes(old, new)
}

/// Same as [`capture_changes`] but on already-unwrapped maps
pub fn capture_map_changes(old: &Map<String, Value>, new: &Map<String, Value>) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for (field, new_value) in new {
        let old_value = old.get(field);
        if old_value != Some(new_value) {
            changes.insert(field.clone(), FieldChange::new(old_value.cloned(), new_value.clone()));
        }
    }

    changes
}

/// Serialize both states and diff them
///
/// Convenience for typed records: `old` is usually the row loaded before the
/// update and `new` the patch that was applied to it.
pub fn capture_record_changes<O, N>(old: &O, new: &N) -> Result<ChangeSet>
where
    O: Serialize,
    N: Serialize,
{
    let old = serde_json::to_value(old)?;
    let new = serde_json::to_value(new)?;

    if !new.is_object() {
        return Err(CommonError::NotAnObject("new state"));
    }

    Ok(capture_changes(&old, &new))
}

/// Diff a record before and after a partial update
///
/// Only the fields named by `patch` are compared, and their values are taken
/// from `new` (the stored row after the update), so normalisation applied on
/// write does not show up as a change. Fields present in `patch` but unknown to
/// the record are ignored.
pub fn capture_patch_changes<R, P>(old: &R, new: &R, patch: &P) -> Result<ChangeSet>
where
    R: Serialize,
    P: Serialize,
{
    let old = serde_json::to_value(old)?;
    let new = serde_json::to_value(new)?;
    let patch = serde_json::to_value(patch)?;

    let (Some(old), Some(new), Some(patch)) = (old.as_object(), new.as_object(), patch.as_object())
    else {
        return Err(CommonError::NotAnObject("record or patch"));
    };

    let applied: Map<String, Value> = patch
        .keys()
        .filter_map(|field| new.get(field).map(|value| (field.clone(), value.clone())))
        .collect();

    Ok(capture_map_changes(old, &applied))
}
