//! The grouping engine.
//!
//! Rows are grouped in a single forward pass. Each row is compared only against rows
//! that appear earlier in the input, through one lookup table per matching type that
//! maps a normalized identifier to the group that first claimed it.
//!
//! # Algorithm
//!
//! ```text
//! for row in rows (input order):
//!     group = first table hit, trying types in configured order and
//!             each type's identifiers in column order
//!     if no hit: group = next_group_id++
//!     register every identifier of every enabled type under `group`
//!     (an identifier already owned by another group keeps its owner)
//! ```
//!
//! Registration happens after the row's group is resolved, so grouping is
//! order-sensitive: chaining works forward in time (row C joins A by email, so a later
//! row D that only shares C's phone joins A too) but earlier rows are never rewritten.
//!
//! # Phases
//!
//! Extracting identifiers is pure per row and may run in parallel (feature `parallel`).
//! The grouping pass itself is strictly sequential.

use crate::matching_type::MatchingType;
use crate::normalize::Normalizer;
use crate::row::Row;
use crate::schema::ColumnSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::num::NonZeroU64;

/// Identifier of a group of rows. Always positive; assigned as 1, 2, 3, … in order of
/// first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(NonZeroU64);

impl GroupId {
    /// The first group handed out by a run.
    pub const FIRST: GroupId = GroupId(NonZeroU64::MIN);

    /// Wrap a raw id, returning `None` for zero.
    #[must_use]
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters describing one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingStats {
    /// Rows processed.
    pub rows: usize,
    /// Distinct groups created.
    pub groups: usize,
    /// Rows that joined an existing group, by the matching type that produced the hit.
    pub matched_by: BTreeMap<MatchingType, usize>,
    /// Distinct identifiers registered per matching type.
    pub identifiers: BTreeMap<MatchingType, usize>,
}

/// The total mapping from row index to group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    groups: Vec<GroupId>,
    stats: GroupingStats,
}

impl GroupAssignment {
    /// Group of the row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<GroupId> {
        self.groups.get(index).copied()
    }

    /// Groups in row order.
    #[must_use]
    pub fn as_slice(&self) -> &[GroupId] {
        &self.groups
    }

    /// `(row index, group)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, GroupId)> + '_ {
        self.groups.iter().copied().enumerate()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.stats.groups
    }

    #[must_use]
    pub fn stats(&self) -> &GroupingStats {
        &self.stats
    }
}

/// Normalized identifiers of one row, one list per planned matching type.
type RowKeys = Vec<Vec<String>>;

/// Assigns groups to rows for a fixed set of candidate columns.
#[derive(Debug, Clone)]
pub struct GroupingEngine {
    plan: Vec<ColumnSet>,
    normalizer: Normalizer,
}

impl GroupingEngine {
    /// `plan` lists the enabled matching types in precedence order.
    #[must_use]
    pub fn new(plan: Vec<ColumnSet>, normalizer: Normalizer) -> Self {
        Self { plan, normalizer }
    }

    #[must_use]
    pub fn plan(&self) -> &[ColumnSet] {
        &self.plan
    }

    /// Group `rows` in input order.
    #[must_use]
    pub fn group(&self, rows: &[Row]) -> GroupAssignment {
        let keys = self.extract_all(rows);
        let mut state = PassState::new(&self.plan);
        for row_keys in &keys {
            state.assign(row_keys);
        }
        let assignment = state.finish();
        debug!(
            "grouped {} rows into {} groups",
            assignment.len(),
            assignment.group_count()
        );
        assignment
    }

    /// Identifiers of `row` for every planned type, skipping absent values.
    fn extract(&self, row: &Row) -> RowKeys {
        self.plan
            .iter()
            .map(|set| {
                set.positions()
                    .iter()
                    .filter_map(|&pos| row.value_at_position(pos))
                    .filter_map(|raw| self.normalizer.normalize(set.matching_type(), raw))
                    .collect()
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn extract_all(&self, rows: &[Row]) -> Vec<RowKeys> {
        rows.iter().map(|row| self.extract(row)).collect()
    }

    #[cfg(feature = "parallel")]
    fn extract_all(&self, rows: &[Row]) -> Vec<RowKeys> {
        use rayon::prelude::*;
        // indexed collect keeps input order
        rows.par_iter().map(|row| self.extract(row)).collect()
    }
}

/// Lookup tables and the group counter for one pass. Never outlives `group`.
struct PassState {
    types: Vec<MatchingType>,
    tables: Vec<HashMap<String, GroupId>>,
    next_group: GroupId,
    groups: Vec<GroupId>,
    stats: GroupingStats,
}

impl PassState {
    fn new(plan: &[ColumnSet]) -> Self {
        Self {
            types: plan.iter().map(ColumnSet::matching_type).collect(),
            tables: plan.iter().map(|_| HashMap::new()).collect(),
            next_group: GroupId::FIRST,
            groups: Vec::new(),
            stats: GroupingStats::default(),
        }
    }

    fn lookup(&self, keys: &RowKeys) -> Option<(GroupId, MatchingType)> {
        self.tables
            .iter()
            .zip(keys)
            .zip(&self.types)
            .find_map(|((table, ids), &t)| {
                ids.iter().find_map(|id| table.get(id).map(|&g| (g, t)))
            })
    }

    fn assign(&mut self, keys: &RowKeys) {
        let group = match self.lookup(keys) {
            Some((group, matched)) => {
                *self.stats.matched_by.entry(matched).or_default() += 1;
                group
            }
            None => {
                let group = self.next_group;
                self.next_group = group.next();
                self.stats.groups += 1;
                group
            }
        };
        self.groups.push(group);

        for (table, ids) in self.tables.iter_mut().zip(keys) {
            for id in ids {
                if let Entry::Vacant(slot) = table.entry(id.clone()) {
                    slot.insert(group);
                }
            }
        }
    }

    fn finish(mut self) -> GroupAssignment {
        self.stats.rows = self.groups.len();
        for (table, &t) in self.tables.iter().zip(&self.types) {
            self.stats.identifiers.insert(t, table.len());
        }
        GroupAssignment {
            groups: self.groups,
            stats: self.stats,
        }
    }
}
