//! Tabular input and output.

pub mod compression;
pub mod csv;

pub use self::csv::{CsvOptions, read_dataset, write_table};
