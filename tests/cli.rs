//! Drives the `match-users` binary.

use std::process::{Command, Output};
use user_matcher::testing::*;

fn match_users(input: &TestInput, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_match-users"))
        .current_dir(input.dir())
        .args(args)
        .output()
        .expect("run match-users")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn groups_into_named_output() -> anyhow::Result<()> {
    let input = TestInput::new(PEOPLE_CSV)?;
    let out = match_users(&input, &["email", "phone", "input.csv", "-o", "grouped.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Results saved to 'grouped.csv'"));

    let grouped = OutputFile::read(input.dir().join("grouped.csv"))?;
    assert_same_user(&grouped, "FirstName", "John", "Jonathan");
    Ok(())
}

#[test]
fn default_output_name_is_timestamped() -> anyhow::Result<()> {
    let input = TestInput::new(PEOPLE_CSV)?;
    let out = match_users(&input, &["email", "input.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let written: Vec<String> = std::fs::read_dir(input.dir())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("matched_") && n.ends_with("_input.csv"))
        .collect();
    assert_eq!(written.len(), 1, "files: {written:?}");
    // matched_ + 14 digit timestamp + _input.csv
    assert_eq!(written[0].len(), "matched_".len() + 14 + "_input.csv".len());
    assert!(stdout(&out).contains(&written[0]));
    Ok(())
}

#[test]
fn invalid_type_exits_nonzero() -> anyhow::Result<()> {
    let input = TestInput::new(PEOPLE_CSV)?;
    let out = match_users(&input, &["fax", "input.csv"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Invalid matching type(s): fax"));
    Ok(())
}

#[test]
fn missing_input_exits_nonzero() -> anyhow::Result<()> {
    let input = TestInput::new(PEOPLE_CSV)?;
    let out = match_users(&input, &["email", "nope.csv"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Input file 'nope.csv' does not exist"));
    Ok(())
}

#[test]
fn header_only_input_writes_nothing() -> anyhow::Result<()> {
    let input = TestInput::new(HEADER_ONLY_CSV)?;
    let out = match_users(&input, &["email", "input.csv", "-o", "out.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!input.dir().join("out.csv").exists());
    Ok(())
}

#[test]
fn strip_country_code_flag() -> anyhow::Result<()> {
    let input = TestInput::new(PHONE_FORMATS_CSV)?;
    let out = match_users(
        &input,
        &["phone", "input.csv", "-o", "out.csv", "--strip-country-code"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let grouped = OutputFile::read(input.dir().join("out.csv"))?;
    assert_same_user(&grouped, "FirstName", "John", "Alice");
    Ok(())
}

#[test]
fn missing_arguments_is_a_usage_error() {
    let input = TestInput::new(PEOPLE_CSV).expect("fixture");
    let out = match_users(&input, &["input.csv"]);
    assert!(!out.status.success());
}
