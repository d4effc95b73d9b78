//! Matching types and their eager validation.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category of identifier used to decide whether two rows describe the same user.
///
/// The declaration order is also the `Ord` order, which only matters for reporting;
/// matching precedence always follows the order the caller configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingType {
    Email,
    Phone,
}

impl MatchingType {
    /// Every supported matching type.
    pub const ALL: [MatchingType; 2] = [MatchingType::Email, MatchingType::Phone];

    /// The token for this type, also the substring searched for in column names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MatchingType::Email => "email",
            MatchingType::Phone => "phone",
        }
    }

    /// Parse an ordered list of tokens, rejecting unknown values before any I/O.
    ///
    /// Duplicates are collapsed, keeping the first mention so precedence is stable.
    ///
    /// # Errors
    /// [`MatchError::InvalidMatchingTypes`] naming every unknown token, or
    /// [`MatchError::NoMatchingTypes`] when `tokens` is empty.
    pub fn parse_all<I, S>(tokens: I) -> Result<Vec<MatchingType>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut invalid = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match token.parse::<MatchingType>() {
                Ok(t) if !parsed.contains(&t) => parsed.push(t),
                Ok(_) => {}
                Err(_) => invalid.push(token.to_string()),
            }
        }
        if !invalid.is_empty() {
            return Err(MatchError::InvalidMatchingTypes {
                invalid,
                valid: Self::ALL.iter().map(|t| t.name().to_string()).collect(),
            });
        }
        if parsed.is_empty() {
            return Err(MatchError::NoMatchingTypes);
        }
        Ok(parsed)
    }
}

impl fmt::Display for MatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchingType {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "email" => Ok(MatchingType::Email),
            "phone" => Ok(MatchingType::Phone),
            other => Err(MatchError::InvalidMatchingTypes {
                invalid: vec![other.to_string()],
                valid: Self::ALL.iter().map(|t| t.name().to_string()).collect(),
            }),
        }
    }
}
