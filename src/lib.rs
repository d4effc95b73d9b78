//! # user-matcher
//!
//! Groups the rows of a CSV file into users. Rows that share a normalized email
//! address and/or phone number receive the same `UserId`, and the result is written as
//! a new file with `UserId` as its leading column.
//!
//! ## Key Features
//!
//! - **Column discovery** - every column whose name contains `email` or `phone`
//!   (case-insensitively) is a candidate identifier column
//! - **Normalization** - emails are trimmed and lowercased, phones reduced to digits;
//!   blank identifiers never match
//! - **Deterministic single pass** - each row is compared only with earlier rows, so the
//!   same input always produces the same ids
//! - **Contiguous output** - rows are sorted by `UserId`, keeping input order within a user
//! - **Compressed I/O** - gzip, zstd, bzip2 and xz inputs and outputs (optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use user_matcher::*;
//!
//! let ds = Dataset::from_records(
//!     ["Name", "Email"],
//!     [["Ann", "a@x.com"], ["Bob", "b@x.com"], ["Annie", " A@X.com"]],
//! );
//! let config = MatcherConfig::from_tokens(["email"]).unwrap();
//! let engine = GroupingEngine::new(
//!     ColumnSet::plan(ds.header(), config.types()),
//!     Normalizer::new(config.phone_options()),
//! );
//! let groups: Vec<u64> = engine.group(ds.rows()).iter().map(|(_, g)| g.get()).collect();
//! assert_eq!(groups, vec![1, 2, 1]);
//! ```
//!
//! ## Matching Rules
//!
//! Matching types are checked in the order they were configured. For each row the
//! first identifier already seen on an earlier row decides its group; otherwise the row
//! starts a new group. All of the row's identifiers are then registered under that
//! group, which lets later rows chain onto it through any of them. Earlier rows are
//! never regrouped.
//!
//! ## Cargo Features
//!
//! - `compression-gzip`, `compression-zstd`, `compression-bzip2`, `compression-xz` -
//!   transparent codecs for input and output files (default)
//! - `metrics` - run counters, printable or saved as JSON (default)
//! - `parallel` - extract identifiers on rayon before the sequential grouping pass

pub mod engine;
pub mod error;
pub mod io;
pub mod matcher;
pub mod matching_type;
pub mod materialize;
#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod normalize;
pub mod output_name;
pub mod row;
pub mod schema;
pub mod testing;

pub use engine::{GroupAssignment, GroupId, GroupingEngine, GroupingStats};
pub use error::{MatchError, Result};
pub use io::{CsvOptions, read_dataset, write_table};
pub use matcher::{MatcherConfig, RunSummary, UserMatcher};
pub use matching_type::MatchingType;
pub use materialize::{MaterializedTable, OutputRow, USER_ID_COLUMN, materialize};
pub use normalize::{Normalizer, PhoneOptions, normalize_email, normalize_phone};
pub use output_name::{default_output_path, default_output_path_now};
pub use row::{Dataset, Header, Row};
pub use schema::{ColumnSet, discover};
