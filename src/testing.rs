//! Testing utilities for matching runs.
//!
//! - **Fixtures**: the reference CSV inputs used across the test suite
//! - **Scratch files**: [`TestInput`] writes CSV text into a temporary directory
//! - **Output inspection**: [`OutputFile`] reads a written result back by column name
//! - **Assertions**: group membership checks over an assignment or an output file
//! - **Failing sinks**: [`CappedWriter`] stands in for a disk that fills up mid-write
//!
//! # Quick Start
//!
//! ```no_run
//! use user_matcher::testing::*;
//! use user_matcher::{MatcherConfig, UserMatcher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = TestInput::new(PEOPLE_CSV)?;
//! let matcher = UserMatcher::new(MatcherConfig::from_tokens(["email"])?, input.path())?;
//! matcher.process_to_file(input.output_path())?;
//!
//! let out = OutputFile::read(input.output_path())?;
//! assert_same_user(&out, "FirstName", "John", "Johnny");
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// A CSV file in its own temporary directory, removed on drop.
pub struct TestInput {
    dir: TempDir,
    path: PathBuf,
}

impl TestInput {
    /// Write `contents` to `input.csv` in a fresh temporary directory.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created.
    pub fn new(contents: &str) -> Result<Self> {
        Self::named("input.csv", contents)
    }

    /// Write `contents` to `file_name` in a fresh temporary directory.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created.
    pub fn named(file_name: &str, contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary directory")?;
        let path = dir.path().join(file_name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(Self { dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// A not-yet-existing output path next to the input.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("output.csv")
    }
}

/// A written result, read back as header plus records keyed by column name.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub header: Vec<String>,
    pub records: Vec<HashMap<String, String>>,
}

impl OutputFile {
    /// # Errors
    /// Returns an error if `path` cannot be read as CSV.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::Reader::from_path(path)
            .with_context(|| format!("open {}", path.display()))?;
        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            records.push(
                header
                    .iter()
                    .cloned()
                    .zip(rec.iter().map(str::to_string))
                    .collect(),
            );
        }
        Ok(Self { header, records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `UserId` of the first record whose `column` equals `value`.
    #[must_use]
    pub fn user_id_where(&self, column: &str, value: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.get(column).is_some_and(|v| v == value))
            .and_then(|r| r.get(crate::USER_ID_COLUMN))
            .map(String::as_str)
    }

    /// `UserId` column in file order.
    #[must_use]
    pub fn user_ids(&self) -> Vec<u64> {
        self.records
            .iter()
            .filter_map(|r| r.get(crate::USER_ID_COLUMN))
            .filter_map(|v| v.parse().ok())
            .collect()
    }
}

/// In-memory sink that refuses bytes past `limit`, like a full disk or a file-size cap.
///
/// Clones share one buffer, so a clone kept by the test can inspect what a boxed
/// writer received.
#[derive(Debug, Clone)]
pub struct CappedWriter {
    limit: usize,
    buf: Rc<RefCell<Vec<u8>>>,
}

impl CappedWriter {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            buf: Rc::default(),
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }
}

impl Write for CappedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.borrow_mut();
        let room = self.limit.saturating_sub(buf.len());
        if room == 0 && !data.is_empty() {
            return Err(io::Error::other("file size limit exceeded"));
        }
        let n = data.len().min(room);
        buf.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
