//! Joins group assignments back onto the original rows.

use crate::engine::{GroupAssignment, GroupId};
use crate::error::{MatchError, Result};
use crate::row::Dataset;
use log::warn;

/// Name of the synthesized leading column.
pub const USER_ID_COLUMN: &str = "UserId";

/// One output record: the assigned group followed by the original values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub group: GroupId,
    /// Position of the row in the input.
    pub source_index: usize,
    pub values: Vec<String>,
}

impl OutputRow {
    /// The record as written: `[group id] + original values`.
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        std::iter::once(self.group.to_string())
            .chain(self.values.iter().cloned())
            .collect()
    }
}

/// Output header and rows, ordered by ascending group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedTable {
    pub header: Vec<String>,
    pub rows: Vec<OutputRow>,
}

impl MaterializedTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Prefix every row of `dataset` with its group and sort by group.
///
/// The sort is stable, so members of one group keep their input order and every
/// group is contiguous in the output.
///
/// # Errors
/// [`MatchError::AssignmentMismatch`] when `assignment` does not cover every row.
pub fn materialize(dataset: &Dataset, assignment: &GroupAssignment) -> Result<MaterializedTable> {
    if assignment.len() != dataset.len() {
        return Err(MatchError::AssignmentMismatch {
            assigned: assignment.len(),
            rows: dataset.len(),
        });
    }

    let names = dataset.header().names();
    if names.iter().any(|n| n == USER_ID_COLUMN) {
        warn!("input already has a {USER_ID_COLUMN} column; output will contain it twice");
    }
    let header = std::iter::once(USER_ID_COLUMN.to_string())
        .chain(names.iter().cloned())
        .collect();

    let mut rows: Vec<OutputRow> = dataset
        .rows()
        .iter()
        .zip(assignment.as_slice())
        .map(|(row, &group)| OutputRow {
            group,
            source_index: row.index(),
            values: row.values().to_vec(),
        })
        .collect();
    rows.sort_by_key(|r| r.group);

    Ok(MaterializedTable { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GroupingEngine;
    use crate::matching_type::MatchingType;
    use crate::normalize::Normalizer;
    use crate::schema::ColumnSet;

    fn group(ds: &Dataset) -> GroupAssignment {
        GroupingEngine::new(
            ColumnSet::plan(ds.header(), &[MatchingType::Email]),
            Normalizer::default(),
        )
        .group(ds.rows())
    }

    #[test]
    fn header_gets_leading_user_id() {
        let ds = Dataset::from_records(["Name", "Email"], [["Ann", "a@x.com"]]);
        let table = materialize(&ds, &group(&ds)).unwrap();
        assert_eq!(table.header, vec!["UserId", "Name", "Email"]);
        assert_eq!(table.rows[0].to_record(), vec!["1", "Ann", "a@x.com"]);
    }

    #[test]
    fn rows_sorted_by_group_stably() {
        let ds = Dataset::from_records(
            ["Name", "Email"],
            [
                ["r0", "a@x.com"],
                ["r1", "b@x.com"],
                ["r2", "a@x.com"],
                ["r3", "b@x.com"],
                ["r4", "a@x.com"],
            ],
        );
        let table = materialize(&ds, &group(&ds)).unwrap();
        let order: Vec<_> = table.rows.iter().map(|r| r.source_index).collect();
        assert_eq!(order, vec![0, 2, 4, 1, 3]);
        let names: Vec<_> = table.rows.iter().map(|r| r.values[0].as_str()).collect();
        assert_eq!(names, vec!["r0", "r2", "r4", "r1", "r3"]);
    }

    #[test]
    fn mismatched_assignment_is_rejected() {
        let ds = Dataset::from_records(["Email"], [["a@x.com"], ["b@x.com"]]);
        let other = Dataset::from_records(["Email"], [["a@x.com"]]);
        let err = materialize(&ds, &group(&other)).unwrap_err();
        assert!(matches!(
            err,
            MatchError::AssignmentMismatch { assigned: 1, rows: 2 }
        ));
    }
}
