//! Schema-flexible rows keyed by column name.
//!
//! A [`Dataset`] owns one shared [`Header`] and the rows read under it. Each [`Row`]
//! keeps its values in header order and is immutable once constructed.

use crate::matching_type::MatchingType;
use crate::schema::discover;
use std::sync::Arc;

/// Ordered column names of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `column`. With duplicate names the first occurrence wins.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.names.iter().position(|n| n == column)
    }
}

/// One input record: values in header order, identified by its 0-based input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<Header>,
    index: usize,
    values: Vec<String>,
}

impl Row {
    /// Build a row. `values` are padded with empty strings or truncated to the header width.
    #[must_use]
    pub fn new(header: Arc<Header>, index: usize, mut values: Vec<String>) -> Self {
        values.resize(header.len(), String::new());
        Self {
            header,
            index,
            values,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of the named column, if the column exists.
    #[must_use]
    pub fn value_at(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|i| self.value_at_position(i))
    }

    #[must_use]
    pub fn value_at_position(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// A fully read tabular input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Arc<Header>,
    rows: Vec<Row>,
}

impl Dataset {
    #[must_use]
    pub fn new(header: Arc<Header>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Build a dataset from in-memory records, numbering rows in order.
    ///
    /// ```
    /// use user_matcher::Dataset;
    ///
    /// let ds = Dataset::from_records(["Name", "Email"], [["Ann", "ann@x.com"]]);
    /// assert_eq!(ds.rows()[0].value_at("Email"), Some("ann@x.com"));
    /// ```
    #[must_use]
    pub fn from_records<H, S, R, V, T>(header: H, records: R) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = V>,
        V: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let header = Arc::new(Header::new(header));
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, values)| {
                Row::new(
                    Arc::clone(&header),
                    i,
                    values.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { header, rows }
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names that are candidates for `matching_type`.
    #[must_use]
    pub fn columns_matching(&self, matching_type: MatchingType) -> Vec<String> {
        discover(self.header.names(), matching_type.name())
    }
}
