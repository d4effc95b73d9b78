//! Run orchestration: configuration, validation, and the read → group → write flow.

use crate::engine::{GroupAssignment, GroupingEngine, GroupingStats};
use crate::error::{MatchError, Result};
use crate::io::{CsvOptions, read_dataset, write_table};
use crate::matching_type::MatchingType;
use crate::materialize::materialize;
use crate::normalize::{Normalizer, PhoneOptions};
use crate::row::Dataset;
use crate::schema::ColumnSet;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;

/// Validated configuration of a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    types: Vec<MatchingType>,
    phone: PhoneOptions,
    csv: CsvOptions,
}

impl MatcherConfig {
    /// Configuration for `types`, in precedence order.
    ///
    /// # Errors
    /// [`MatchError::NoMatchingTypes`] when `types` is empty.
    pub fn new(types: Vec<MatchingType>) -> Result<Self> {
        if types.is_empty() {
            return Err(MatchError::NoMatchingTypes);
        }
        let mut unique = Vec::with_capacity(types.len());
        for t in types {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        Ok(Self {
            types: unique,
            phone: PhoneOptions::default(),
            csv: CsvOptions::default(),
        })
    }

    /// Parse and validate matching-type tokens such as `["email", "phone"]`.
    ///
    /// # Errors
    /// See [`MatchingType::parse_all`].
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(MatchingType::parse_all(tokens)?)
    }

    #[must_use]
    pub fn strip_leading_country_code(mut self, strip: bool) -> Self {
        self.phone.strip_leading_country_code = strip;
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.csv.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn types(&self) -> &[MatchingType] {
        &self.types
    }

    #[must_use]
    pub fn phone_options(&self) -> PhoneOptions {
        self.phone
    }

    #[must_use]
    pub fn csv_options(&self) -> &CsvOptions {
        &self.csv
    }
}

/// Outcome of a run that produced an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub groups: usize,
    pub stats: GroupingStats,
}

/// Groups the rows of one input file.
///
/// ```no_run
/// use user_matcher::{MatcherConfig, UserMatcher};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = MatcherConfig::from_tokens(["email", "phone"])?;
/// let matcher = UserMatcher::new(config, "input.csv")?;
/// if let Some(summary) = matcher.process_to_file("output.csv")? {
///     println!("{} rows in {} groups", summary.rows, summary.groups);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UserMatcher {
    config: MatcherConfig,
    input: PathBuf,
}

impl UserMatcher {
    /// # Errors
    /// [`MatchError::InputNotFound`] if `input` does not exist.
    pub fn new(config: MatcherConfig, input: impl Into<PathBuf>) -> Result<Self> {
        let input = input.into();
        if !input.exists() {
            return Err(MatchError::InputNotFound(input));
        }
        Ok(Self { config, input })
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Discover candidate columns and group every row of `dataset`.
    #[must_use]
    pub fn process(&self, dataset: &Dataset) -> GroupAssignment {
        let plan = ColumnSet::plan(dataset.header(), self.config.types());
        if plan.iter().all(ColumnSet::is_empty) {
            warn!(
                "no column matches any of {:?}; every row becomes its own group",
                self.config.types()
            );
        }
        GroupingEngine::new(plan, Normalizer::new(self.config.phone)).group(dataset.rows())
    }

    /// Read the input, group it and write the result to `output`.
    ///
    /// Returns `Ok(None)` without creating `output` when the input has no data rows.
    ///
    /// # Errors
    /// [`MatchError::Read`] for unreadable input, [`MatchError::Write`] when the
    /// output cannot be written.
    pub fn process_to_file(&self, output: impl AsRef<Path>) -> Result<Option<RunSummary>> {
        self.run(output.as_ref(), |_| {})
    }

    /// [`process_to_file`](Self::process_to_file), also recording run metrics.
    ///
    /// # Errors
    /// See [`process_to_file`](Self::process_to_file).
    #[cfg(feature = "metrics")]
    pub fn process_to_file_with_metrics(
        &self,
        output: impl AsRef<Path>,
        metrics: &mut MetricsCollector,
    ) -> Result<Option<RunSummary>> {
        metrics.record_start();
        let summary = self.run(output.as_ref(), |stats| metrics.record_grouping(stats));
        metrics.record_end();
        summary
    }

    fn run(
        &self,
        output: &Path,
        on_grouped: impl FnOnce(&GroupingStats),
    ) -> Result<Option<RunSummary>> {
        let dataset = read_dataset(&self.input, self.config.csv_options())?;
        if dataset.is_empty() {
            info!("{} has no data rows; nothing written", self.input.display());
            return Ok(None);
        }

        let assignment = self.process(&dataset);
        on_grouped(assignment.stats());
        let table = materialize(&dataset, &assignment)?;
        let rows = write_table(output, &table, self.config.csv_options())?;

        info!(
            "grouped {rows} rows into {} users; wrote {}",
            assignment.group_count(),
            output.display()
        );
        Ok(Some(RunSummary {
            output: output.to_path_buf(),
            rows,
            groups: assignment.group_count(),
            stats: assignment.stats().clone(),
        }))
    }
}
