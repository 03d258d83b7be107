//! Owner association diffing
//!
//! Resources carry owner user and owner group id lists. On update the
//! provider compares the configured ids with the ones recorded in state and
//! issues one add call and one remove call for the difference.

use serde_json::Value;
use std::collections::BTreeSet;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssociationError {
    #[error("expected an integer id or an object with an integer 'id', got: {0}")]
    UnsupportedValue(Value),
}

/// Ids to add and remove to turn `current` into `desired`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Associations {
    pub to_add: Vec<i64>,
    pub to_remove: Vec<i64>,
}

impl Associations {
    pub fn changed(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }
}

/// Set difference in both directions. Duplicates collapse; output is ascending.
pub fn determine_associations(desired: &[i64], current: &[i64]) -> Associations {
    let desired: BTreeSet<i64> = desired.iter().copied().collect();
    let current: BTreeSet<i64> = current.iter().copied().collect();

    Associations {
        to_add: desired.difference(&current).copied().collect(),
        to_remove: current.difference(&desired).copied().collect(),
    }
}

/// Convert a list of ids as the schema stores them: bare integers or `{"id": n}` blocks.
pub fn ids_from_values(values: &[Value]) -> Result<Vec<i64>, AssociationError> {
    values
        .iter()
        .map(|value| {
            let id = match value {
                Value::Object(map) => map.get("id").and_then(Value::as_i64),
                other => other.as_i64(),
            };
            id.ok_or_else(|| AssociationError::UnsupportedValue(value.clone()))
        })
        .collect()
}

/// Diff an id-list field between its state value and its configured value
pub fn association_changed(
    old: &[Value],
    new: &[Value],
) -> Result<Associations, AssociationError> {
    let old_ids = ids_from_values(old)?;
    let new_ids = ids_from_values(new)?;
    Ok(determine_associations(&new_ids, &old_ids))
}

/// Change to a single-id field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleAssociation {
    Unchanged,
    /// Point at this id now
    Set(i64),
    /// Drop the association with this id
    Removed(i64),
}

/// Compare a single-id field. An unset or zero new value removes the old one.
pub fn association_changed_int(old: Option<i64>, new: Option<i64>) -> SingleAssociation {
    let old = old.filter(|id| *id != 0);
    let new = new.filter(|id| *id != 0);

    match (old, new) {
        (o, n) if o == n => SingleAssociation::Unchanged,
        (_, Some(n)) => SingleAssociation::Set(n),
        (Some(o), None) => SingleAssociation::Removed(o),
        (None, None) => SingleAssociation::Unchanged,
    }
}

/// Elements of `left` that are not in `right`, in `left`'s order
pub fn find_differences<T: Eq + Hash + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    let right: std::collections::HashSet<&T> = right.iter().collect();
    left.iter().filter(|v| !right.contains(v)).cloned().collect()
}
