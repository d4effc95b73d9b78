//! Reading datasets from and writing grouped tables to delimited text.
//!
//! # Design notes
//! - Records must all have the header's width; a ragged file is malformed input.
//! - The whole input is read before anything is written.
//! - Output goes to a temporary file next to the destination and is renamed into
//!   place only after the stream has been finished and synced, so a failed write never
//!   leaves a partial file behind.

use crate::error::{MatchError, Result};
use crate::io::compression::{FinishWrite, auto_detect_reader, auto_detect_writer};
use crate::materialize::MaterializedTable;
use crate::row::{Dataset, Header, Row};
use anyhow::Context;
use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Delimited-text dialect shared by the reader and the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Read `path` into a [`Dataset`]. The first record is the header.
///
/// Compressed inputs are detected by extension or magic bytes.
///
/// # Errors
/// [`MatchError::Read`] if the file cannot be opened, is not valid UTF-8, or has a
/// record whose width differs from the header.
pub fn read_dataset(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| MatchError::read(path, e))?;
    let rdr = auto_detect_reader(f, path).map_err(|e| MatchError::read(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(rdr);

    let header = rdr
        .headers()
        .context("parse CSV header")
        .map_err(|e| MatchError::read(path, e))?;
    let header = Arc::new(Header::new(header.iter()));

    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec
            .with_context(|| format!("parse CSV record #{}", i + 1))
            .map_err(|e| MatchError::read(path, e))?;
        rows.push(Row::new(
            Arc::clone(&header),
            i,
            rec.iter().map(str::to_string).collect(),
        ));
    }
    debug!(
        "read {} rows with {} columns from {}",
        rows.len(),
        header.len(),
        path.display()
    );
    Ok(Dataset::new(header, rows))
}

/// Write `table` to `path`, returning the number of data rows written.
///
/// The output is compressed when the extension of `path` names a codec.
///
/// # Errors
/// [`MatchError::Write`] if the destination directory is not writable or any
/// record fails to serialize or flush. The destination is left untouched.
pub fn write_table(
    path: impl AsRef<Path>,
    table: &MaterializedTable,
    options: &CsvOptions,
) -> Result<usize> {
    let path = path.as_ref();
    write_atomically(path, table, options).map_err(|e| MatchError::write(path, e))?;
    debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(table.len())
}

fn write_atomically(
    path: &Path,
    table: &MaterializedTable,
    options: &CsvOptions,
) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = temp_file_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    let f = tmp.as_file().try_clone().context("open temporary file")?;
    let sink = auto_detect_writer(f, path)
        .with_context(|| format!("setup compression for {}", path.display()))?;

    encode_table(sink, table, options)?;
    tmp.as_file().sync_all().context("sync output to disk")?;
    tmp.persist(path)
        .with_context(|| format!("move output into {}", path.display()))?;
    Ok(())
}

/// Scratch file for the output, created with the mode a plain `File::create` would get.
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".match-users-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        // open(2) applies the umask to this
        builder.permissions(Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Serialize `table` into `sink` and finish the stream. Only an `Ok` return means
/// every byte, trailer included, reached the underlying writer.
fn encode_table(
    sink: Box<dyn FinishWrite>,
    table: &MaterializedTable,
    options: &CsvOptions,
) -> anyhow::Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(sink);
    wtr.write_record(&table.header).context("write CSV header")?;
    for (i, row) in table.rows.iter().enumerate() {
        wtr.write_record(row.to_record())
            .with_context(|| format!("write CSV row #{}", i + 1))?;
    }
    let sink = wtr
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context("flush CSV writer")?;
    sink.finish().context("finish output stream")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::compression::Codec;
    use crate::testing::CappedWriter;
    use std::fs;

    #[test]
    fn reads_header_and_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("in.csv");
        fs::write(&path, "Name,Email\nAnn,a@x.com\n\"Doe, Bo\",b@x.com\n")?;
        let ds = read_dataset(&path, &CsvOptions::default())?;
        assert_eq!(ds.header().names(), ["Name", "Email"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1].value_at("Name"), Some("Doe, Bo"));
        Ok(())
    }

    #[test]
    fn ragged_rows_are_malformed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.csv");
        fs::write(&path, "A,B\n1,2\n3\n")?;
        let err = read_dataset(&path, &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, MatchError::Read { .. }));
        Ok(())
    }

    #[test]
    fn custom_delimiter() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("in.tsv");
        fs::write(&path, "Name\tPhone\nAnn\t555-1234\n")?;
        let ds = read_dataset(&path, &CsvOptions { delimiter: b'\t' })?;
        assert_eq!(ds.rows()[0].value_at("Phone"), Some("555-1234"));
        Ok(())
    }

    fn sample_table(rows: usize) -> anyhow::Result<MaterializedTable> {
        let records: Vec<Vec<String>> = (0..rows)
            .map(|i| vec![format!("user{}@example.com", i % 7), format!("row {i}")])
            .collect();
        let ds = Dataset::from_records(["Email", "Note"], records);
        let engine = crate::engine::GroupingEngine::new(
            crate::schema::ColumnSet::plan(ds.header(), &[crate::MatchingType::Email]),
            crate::normalize::Normalizer::default(),
        );
        Ok(crate::materialize::materialize(&ds, &engine.group(ds.rows()))?)
    }

    /// Bytes `table` encodes to under `name`, and whether encoding into a sink one byte
    /// short of that fails.
    fn truncated_encode_fails(name: &str, table: &MaterializedTable) -> anyhow::Result<bool> {
        let full = CappedWriter::unlimited();
        encode_table(auto_detect_writer(full.clone(), name)?, table, &CsvOptions::default())?;
        assert!(!full.is_empty());

        let short = CappedWriter::new(full.len() - 1);
        let sink = auto_detect_writer(short, name)?;
        Ok(encode_table(sink, table, &CsvOptions::default()).is_err())
    }

    #[test]
    fn truncated_plain_output_is_an_error() -> anyhow::Result<()> {
        assert!(truncated_encode_fails("out.csv", &sample_table(300)?)?);
        Ok(())
    }

    #[test]
    fn truncated_compressed_output_is_an_error() -> anyhow::Result<()> {
        let table = sample_table(300)?;
        for &codec in Codec::ALL {
            let name = format!("out.csv{}", codec.extensions()[0]);
            assert!(truncated_encode_fails(&name, &table)?, "{} trailer loss went unnoticed", codec.name());
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn output_gets_default_file_mode() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let reference = dir.path().join("reference");
        fs::File::create(&reference)?;
        let expected = fs::metadata(&reference)?.permissions().mode() & 0o777;

        let table = sample_table(3)?;
        for name in ["out.csv", "out.csv.gz"] {
            let out = dir.path().join(name);
            write_table(&out, &table, &CsvOptions::default())?;
            assert_eq!(fs::metadata(&out)?.permissions().mode() & 0o777, expected, "{name}");
        }
        Ok(())
    }
}
