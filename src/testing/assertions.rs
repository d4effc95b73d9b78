//! Assertions over group assignments and written outputs.

use super::OutputFile;
use crate::engine::GroupAssignment;
use std::collections::HashSet;

/// Assert that the output rows whose `column` equals `a` and `b` share a `UserId`.
///
/// # Panics
///
/// Panics if either row is missing or the ids differ.
pub fn assert_same_user(out: &OutputFile, column: &str, a: &str, b: &str) {
    let ida = out
        .user_id_where(column, a)
        .unwrap_or_else(|| panic!("no row with {column} = {a:?}"));
    let idb = out
        .user_id_where(column, b)
        .unwrap_or_else(|| panic!("no row with {column} = {b:?}"));
    assert_eq!(
        ida, idb,
        "expected {column} {a:?} and {b:?} to share a UserId, got {ida} and {idb}"
    );
}

/// Assert that the output rows whose `column` equals `a` and `b` have different `UserId`s.
///
/// # Panics
///
/// Panics if either row is missing or the ids are equal.
pub fn assert_different_users(out: &OutputFile, column: &str, a: &str, b: &str) {
    let ida = out
        .user_id_where(column, a)
        .unwrap_or_else(|| panic!("no row with {column} = {a:?}"));
    let idb = out
        .user_id_where(column, b)
        .unwrap_or_else(|| panic!("no row with {column} = {b:?}"));
    assert_ne!(
        ida, idb,
        "expected {column} {a:?} and {b:?} to have different UserIds, both got {ida}"
    );
}

/// Assert that `assignment` places rows `a` and `b` in the same group.
///
/// # Panics
///
/// Panics if either index is out of range or the groups differ.
pub fn assert_same_group(assignment: &GroupAssignment, a: usize, b: usize) {
    let (ga, gb) = (assignment.get(a), assignment.get(b));
    assert!(ga.is_some() && gb.is_some(), "row index out of range");
    assert_eq!(ga, gb, "expected rows {a} and {b} in one group");
}

/// Assert that every listed row is in a group of its own among the listed rows.
///
/// # Panics
///
/// Panics if two listed rows share a group.
pub fn assert_distinct_groups(assignment: &GroupAssignment, rows: &[usize]) {
    let mut seen = HashSet::new();
    for &i in rows {
        let g = assignment
            .get(i)
            .unwrap_or_else(|| panic!("row index {i} out of range"));
        assert!(seen.insert(g), "row {i} shares group {g} with an earlier listed row");
    }
}

/// Assert that first-seen group ids, in row order, are exactly `1, 2, 3, …`.
///
/// # Panics
///
/// Panics on a gap, a reuse, or a non-increasing first appearance.
pub fn assert_monotonic_first_seen(assignment: &GroupAssignment) {
    let mut next = 1u64;
    for (i, g) in assignment.iter() {
        let g = g.get();
        if g == next {
            next += 1;
        } else {
            assert!(
                g < next,
                "row {i} introduced group {g} but the next new group should be {next}"
            );
        }
    }
}
