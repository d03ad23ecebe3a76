//! # Indexed List Editing
//!
//! Pure operations over an ordered list of line-item rows. Every operation
//! borrows the current list and returns a new one; the caller stores the
//! result wherever its state lives.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_at(list, i, Field(patch))    list[i] with one field overwritten    │
//! │  set_at(list, i, Replace(v))      list[i] replaced by v                 │
//! │  insert_after(list, After(i), v)  v lands at i + 1, later rows shift up │
//! │  insert_after(list, Front, v)     v lands at 0                          │
//! │  delete_at(list, i)               row i removed, unless only one row    │
//! │  find_duplicate_indices(list, k)  every row whose key collides          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `delete_at` never empties a list: on a list of length 0 or 1 it returns
//!   the list unchanged, before looking at the index.
//! - Indices outside `[0, len)` are rejected with
//!   [`ListEditError::IndexOutOfRange`], never clamped.
//! - Rows are cloned, never shared: editing row `i` cannot affect row `j`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::ListEditError;
use crate::structured::{StructuredRecord, StructuredValue};

/// Result type for list editing operations.
pub type ListResult<T> = Result<T, ListEditError>;

// =============================================================================
// Field Patches
// =============================================================================

/// A row type that can have a single field overwritten.
///
/// `Patch` names the field and carries its new value, e.g. an enum with one
/// variant per field.
pub trait FieldPatch {
    type Patch;

    /// Overwrites the one field named by `patch`; other fields are untouched.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Structured records are patched by field name.
impl FieldPatch for StructuredRecord {
    type Patch = (String, StructuredValue);

    fn apply_patch(&mut self, (field, value): Self::Patch) {
        self.insert(field, value);
    }
}

/// What `set_at` should do to the row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowUpdate<T: FieldPatch> {
    /// Shallow-merge one field.
    Field(T::Patch),
    /// Replace the whole row.
    Replace(T),
}

/// Where `insert_after` puts the new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// Before every existing row (the "after index -1" case).
    Front,
    /// Immediately after the row at this index.
    After(usize),
}

// =============================================================================
// Operations
// =============================================================================

/// Returns a copy of `list` with row `index` updated.
///
/// ## Example
/// ```rust
/// use stockbook_core::list_edit::{set_at, RowUpdate};
/// use stockbook_core::structured::StructuredRecord;
///
/// let rows = vec![StructuredRecord::new().with("a", 1).with("b", 2)];
/// let rows = set_at(&rows, 0, RowUpdate::Field(("a".into(), 99.into()))).unwrap();
///
/// assert_eq!(rows[0], StructuredRecord::new().with("a", 99).with("b", 2));
/// ```
pub fn set_at<T>(list: &[T], index: usize, update: RowUpdate<T>) -> ListResult<Vec<T>>
where
    T: Clone + FieldPatch,
{
    check_index(index, list.len())?;

    let mut items = list.to_vec();
    match update {
        RowUpdate::Field(patch) => items[index].apply_patch(patch),
        RowUpdate::Replace(value) => items[index] = value,
    }
    Ok(items)
}

/// Returns a copy of `list` with `value` inserted at the given point.
///
/// `After(len - 1)` appends; `Front` prepends and is valid on an empty list.
pub fn insert_after<T: Clone>(list: &[T], at: InsertPoint, value: T) -> ListResult<Vec<T>> {
    let position = match at {
        InsertPoint::Front => 0,
        InsertPoint::After(index) => {
            check_index(index, list.len())?;
            index + 1
        }
    };

    let mut items = Vec::with_capacity(list.len() + 1);
    items.extend_from_slice(&list[..position]);
    items.push(value);
    items.extend_from_slice(&list[position..]);
    Ok(items)
}

/// Returns a copy of `list` without row `index`.
///
/// A list with one row (or none) comes back unchanged: at least one editable
/// row always remains.
pub fn delete_at<T: Clone>(list: &[T], index: usize) -> ListResult<Vec<T>> {
    if list.len() <= 1 {
        return Ok(list.to_vec());
    }

    check_index(index, list.len())?;

    let mut items = list.to_vec();
    items.remove(index);
    Ok(items)
}

/// Collects every index whose key was already seen at an earlier index,
/// together with that earlier index.
///
/// ## Example
/// ```rust
/// use std::collections::HashSet;
/// use stockbook_core::list_edit::find_duplicate_indices;
///
/// let codes = ["X", "Y", "X"];
/// let dupes = find_duplicate_indices(&codes, |code| *code);
/// assert_eq!(dupes, HashSet::from([0, 2]));
/// ```
pub fn find_duplicate_indices<T, K, F>(list: &[T], key: F) -> HashSet<usize>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut first_seen: HashMap<K, usize> = HashMap::new();
    let mut duplicates = HashSet::new();

    for (i, item) in list.iter().enumerate() {
        match first_seen.entry(key(item)) {
            Entry::Occupied(entry) => {
                duplicates.insert(*entry.get());
                duplicates.insert(i);
            }
            Entry::Vacant(entry) => {
                entry.insert(i);
            }
        }
    }

    duplicates
}

fn check_index(index: usize, len: usize) -> ListResult<()> {
    if index >= len {
        return Err(ListEditError::IndexOutOfRange { index, len });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[(&str, i64)]) -> StructuredRecord {
        fields.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn field(name: &str, value: i64) -> RowUpdate<StructuredRecord> {
        RowUpdate::Field((name.to_string(), StructuredValue::from(value)))
    }

    #[test]
    fn test_set_at_field_merges() {
        let list = vec![rec(&[("a", 1), ("b", 2)])];
        let out = set_at(&list, 0, field("a", 99)).unwrap();

        assert_eq!(out, vec![rec(&[("a", 99), ("b", 2)])]);
        // input untouched
        assert_eq!(list, vec![rec(&[("a", 1), ("b", 2)])]);
    }

    #[test]
    fn test_set_at_replace() {
        let list = vec![rec(&[("a", 1)])];
        let out = set_at(&list, 0, RowUpdate::Replace(rec(&[("a", 5), ("b", 6)]))).unwrap();

        assert_eq!(out, vec![rec(&[("a", 5), ("b", 6)])]);
    }

    #[test]
    fn test_set_at_out_of_range() {
        let list = vec![rec(&[("a", 1)])];
        let err = set_at(&list, 1, field("a", 2)).unwrap_err();

        assert_eq!(err, ListEditError::IndexOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn test_set_at_touches_only_target_row() {
        let list = vec![rec(&[("a", 1)]), rec(&[("a", 2)]), rec(&[("a", 3)])];

        for index in 0..list.len() {
            let out = set_at(&list, index, field("a", 100)).unwrap();
            for (j, row) in out.iter().enumerate() {
                if j == index {
                    assert_eq!(row, &rec(&[("a", 100)]));
                } else {
                    assert_eq!(row, &list[j]);
                }
            }
        }
    }

    #[test]
    fn test_insert_after_middle() {
        let out = insert_after(&["x", "y"], InsertPoint::After(0), "z").unwrap();
        assert_eq!(out, vec!["x", "z", "y"]);
    }

    #[test]
    fn test_insert_after_last_appends() {
        let out = insert_after(&["x", "y"], InsertPoint::After(1), "z").unwrap();
        assert_eq!(out, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_insert_front_prepends() {
        let out = insert_after(&["x", "y"], InsertPoint::Front, "z").unwrap();
        assert_eq!(out, vec!["z", "x", "y"]);

        let empty: [&str; 0] = [];
        assert_eq!(insert_after(&empty, InsertPoint::Front, "z").unwrap(), vec!["z"]);
    }

    #[test]
    fn test_insert_after_out_of_range() {
        let err = insert_after(&["x"], InsertPoint::After(1), "z").unwrap_err();
        assert_eq!(err, ListEditError::IndexOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn test_delete_keeps_last_row() {
        assert_eq!(delete_at(&["x"], 0).unwrap(), vec!["x"]);
        // the floor wins over a bad index
        assert_eq!(delete_at(&["x"], 7).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_delete_removes_row() {
        assert_eq!(delete_at(&["x", "y"], 0).unwrap(), vec!["y"]);
        assert_eq!(delete_at(&["x", "y", "z"], 2).unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let err = delete_at(&["x", "y"], 2).unwrap_err();
        assert_eq!(err, ListEditError::IndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn test_find_duplicates_marks_both_sides() {
        let list = vec![
            StructuredRecord::new().with("k", "X"),
            StructuredRecord::new().with("k", "Y"),
            StructuredRecord::new().with("k", "X"),
        ];
        let dupes = find_duplicate_indices(&list, |r| {
            r.get("k")
                .and_then(StructuredValue::as_primitive)
                .map(ToString::to_string)
        });

        assert_eq!(dupes, HashSet::from([0, 2]));
    }

    #[test]
    fn test_find_duplicates_triple_and_none() {
        assert_eq!(
            find_duplicate_indices(&["a", "b", "a", "c", "a"], |s| *s),
            HashSet::from([0, 2, 4])
        );
        assert!(find_duplicate_indices(&["a", "b", "c"], |s| *s).is_empty());
    }
}
