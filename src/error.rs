//! Error taxonomy for a matching run.
//!
//! Every variant is terminal for the run: configuration errors are raised before any
//! file I/O, input errors before or during the read phase, and output errors after
//! grouping has finished. There is no partial-success mode.

use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors produced while configuring or executing a matching run.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// One or more matching-type tokens are not recognized.
    #[error("Invalid matching type(s): {}. Valid types are: {}", .invalid.join(", "), .valid.join(", "))]
    InvalidMatchingTypes {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    /// No matching type was supplied.
    #[error("At least one matching type is required. Valid types are: email, phone")]
    NoMatchingTypes,

    /// The input file does not exist.
    #[error("Input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    /// The input could not be opened or is not well-formed tabular text.
    #[error("Error reading CSV file '{}': {source:#}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The output could not be written.
    #[error("Error writing to output file '{}': {source:#}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A group assignment does not cover the dataset it is joined with.
    #[error("group assignment covers {assigned} rows but the dataset has {rows}")]
    AssignmentMismatch { assigned: usize, rows: usize },
}

impl MatchError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_types_message_lists_offenders_and_valid_set() {
        let err = MatchError::InvalidMatchingTypes {
            invalid: vec!["fax".into(), "zip".into()],
            valid: vec!["email".into(), "phone".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid matching type(s): fax, zip. Valid types are: email, phone"
        );
    }

    #[test]
    fn input_not_found_names_the_path() {
        let err = MatchError::InputNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "Input file 'missing.csv' does not exist");
    }
}
