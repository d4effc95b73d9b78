//! Default output filenames.

use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// `matched_<YYYYmmddHHMMSS>_<input file name>`, relative to the working directory.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use user_matcher::default_output_path;
///
/// let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// let out = default_output_path("data/input.csv", now);
/// assert_eq!(out.to_str(), Some("matched_20240309140507_input.csv"));
/// ```
#[must_use]
pub fn default_output_path<Tz: TimeZone>(input: impl AsRef<Path>, now: DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let base = input
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.csv".to_string());
    PathBuf::from(format!("matched_{}_{base}", now.format("%Y%m%d%H%M%S")))
}

/// [`default_output_path`] stamped with the current local time.
#[must_use]
pub fn default_output_path_now(input: impl AsRef<Path>) -> PathBuf {
    default_output_path(input, Local::now())
}
