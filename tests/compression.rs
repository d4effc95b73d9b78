//! Matching runs over compressed inputs and outputs.

use user_matcher::io::compression::{Codec, auto_detect_reader, auto_detect_writer};
use user_matcher::testing::*;
use user_matcher::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

fn write_compressed(path: &Path, text: &str) -> anyhow::Result<()> {
    let mut writer = auto_detect_writer(File::create(path)?, path)?;
    writer.write_all(text.as_bytes())?;
    writer.finish()?;
    Ok(())
}

fn read_decompressed(path: &Path) -> anyhow::Result<String> {
    let mut reader = auto_detect_reader(File::open(path)?, path)?;
    let mut out = String::new();
    reader.read_to_string(&mut out)?;
    Ok(out)
}

/// Compress the people fixture to `input_name`, group it into `output_name`, and check both ends.
#[allow(dead_code)]
fn roundtrip(input_name: &str, output_name: &str) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join(input_name);
    let output = dir.path().join(output_name);
    write_compressed(&input, PEOPLE_CSV)?;

    let raw = std::fs::read(&input)?;
    assert_ne!(raw, PEOPLE_CSV.as_bytes(), "input should be compressed");

    let matcher = UserMatcher::new(MatcherConfig::from_tokens(["email"])?, &input)?;
    let summary = matcher.process_to_file(&output)?.expect("non-empty input");
    assert_eq!(summary.rows, 4);

    let text = read_decompressed(&output)?;
    assert!(text.starts_with("UserId,FirstName,LastName,Phone,Email,Zip\n"));
    assert_eq!(text.lines().count(), 5);
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_roundtrip() -> anyhow::Result<()> {
    roundtrip("people.csv.gz", "grouped.csv.gz")
}

#[cfg(feature = "compression-zstd")]
#[test]
fn zstd_roundtrip() -> anyhow::Result<()> {
    roundtrip("people.csv.zst", "grouped.csv.zst")
}

#[cfg(feature = "compression-bzip2")]
#[test]
fn bzip2_roundtrip() -> anyhow::Result<()> {
    roundtrip("people.csv.bz2", "grouped.csv.bz2")
}

#[cfg(feature = "compression-xz")]
#[test]
fn xz_roundtrip() -> anyhow::Result<()> {
    roundtrip("people.csv.xz", "grouped.csv.xz")
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_detected_by_magic_bytes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let gz = dir.path().join("people.csv.gz");
    write_compressed(&gz, PEOPLE_CSV)?;
    // same bytes under a plain name
    let disguised = dir.path().join("people.csv");
    std::fs::copy(&gz, &disguised)?;

    let ds = read_dataset(&disguised, &CsvOptions::default())?;
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.rows()[3].value_at("FirstName"), Some("Jonathan"));
    Ok(())
}

#[test]
fn uncompressed_passthrough() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plain.csv");
    write_compressed(&path, PEOPLE_CSV)?;
    assert_eq!(std::fs::read_to_string(&path)?, PEOPLE_CSV);
    assert_eq!(read_decompressed(&path)?, PEOPLE_CSV);
    Ok(())
}

/// Compress `text` for `name` into `sink`, finishing the stream.
fn compress_into(sink: CappedWriter, name: &str, text: &str) -> anyhow::Result<()> {
    let mut writer = auto_detect_writer(sink, name)?;
    writer.write_all(text.as_bytes())?;
    writer.finish()?;
    Ok(())
}

#[test]
fn lost_trailer_fails_the_stream() -> anyhow::Result<()> {
    let text = PEOPLE_CSV.repeat(50);
    for &codec in Codec::ALL {
        let name = format!("grouped.csv{}", codec.extensions()[0]);
        let full = CappedWriter::unlimited();
        compress_into(full.clone(), &name, &text)?;

        // one byte short: only the end of the trailer is missing
        let result = compress_into(CappedWriter::new(full.len() - 1), &name, &text);
        assert!(result.is_err(), "{} reported success on a truncated stream", codec.name());
    }
    Ok(())
}
