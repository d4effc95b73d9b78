//! Candidate column discovery.

use crate::matching_type::MatchingType;
use crate::row::Header;
use log::debug;

/// Columns whose lowercased name contains `match_type` as a substring, in header order.
///
/// Returns an empty vector when nothing matches; callers treat that as "no identifiers".
///
/// ```
/// use user_matcher::discover;
///
/// let cols = discover(&["FirstName", "WorkEmail", "Phone", "email"], "email");
/// assert_eq!(cols, vec!["WorkEmail", "email"]);
/// ```
#[must_use]
pub fn discover<S: AsRef<str>>(column_names: &[S], match_type: &str) -> Vec<String> {
    let needle = match_type.to_lowercase();
    column_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// Candidate columns for one matching type, resolved to header positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    matching_type: MatchingType,
    columns: Vec<String>,
    positions: Vec<usize>,
}

impl ColumnSet {
    /// Discover the columns of `header` that belong to `matching_type`.
    #[must_use]
    pub fn discover(header: &Header, matching_type: MatchingType) -> Self {
        let names = header.names();
        let needle = matching_type.name();
        let (columns, positions): (Vec<_>, Vec<_>) = names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.to_lowercase().contains(needle))
            .map(|(i, name)| (name.clone(), i))
            .unzip();
        if columns.is_empty() {
            debug!("no {matching_type} columns in header; {matching_type} contributes no identifiers");
        } else {
            debug!("{matching_type} columns: {columns:?}");
        }
        Self {
            matching_type,
            columns,
            positions,
        }
    }

    /// Build one set per type, keeping the configured order.
    #[must_use]
    pub fn plan(header: &Header, types: &[MatchingType]) -> Vec<ColumnSet> {
        types.iter().map(|&t| Self::discover(header, t)).collect()
    }

    #[must_use]
    pub fn matching_type(&self) -> MatchingType {
        self.matching_type
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
