// match-users - group CSV rows into users by email and/or phone

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use env_logger::Env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use user_matcher::{MatchError, MatcherConfig, UserMatcher, default_output_path_now};

#[derive(Parser)]
#[command(name = "match-users")]
#[command(about = "Assign a UserId to every row of a CSV file, grouping rows that share an email or phone")]
#[command(version)]
#[command(after_help = "\
Examples:
  match-users email input.csv
  match-users email phone input.csv
  match-users phone email people.csv.gz -o grouped.csv")]
struct Cli {
    /// Matching types in precedence order (email, phone)
    #[arg(required = true, num_args = 1.., value_name = "TYPE")]
    types: Vec<String>,

    /// Input CSV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: matched_<timestamp>_<input name>)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Treat 11-digit phone numbers with a leading 1 as their 10-digit form
    #[arg(long)]
    strip_country_code: bool,

    /// Field delimiter for input and output
    #[arg(long, short = 'd', default_value = ",")]
    delimiter: char,

    /// Print run metrics after processing
    #[cfg(feature = "metrics")]
    #[arg(long)]
    metrics: bool,

    /// Save run metrics as JSON
    #[cfg(feature = "metrics")]
    #[arg(long, value_name = "PATH")]
    metrics_json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // library errors already carry their cause chain
            match e.downcast_ref::<MatchError>() {
                Some(err) => eprintln!("Error: {err}"),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }
    let config = MatcherConfig::from_tokens(&cli.types)?
        .strip_leading_country_code(cli.strip_country_code)
        .delimiter(cli.delimiter as u8);
    let matcher = UserMatcher::new(config, &cli.input)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path_now(&cli.input));

    let summary = process(&cli, &matcher, &output)?;

    match summary {
        Some(_) => println!(
            "Processing complete. Results saved to '{}'.",
            output.display()
        ),
        None => println!(
            "Input '{}' has no data rows; no output file was written.",
            cli.input.display()
        ),
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn process(
    cli: &Cli,
    matcher: &UserMatcher,
    output: &Path,
) -> Result<Option<user_matcher::RunSummary>> {
    use anyhow::Context;
    use user_matcher::metrics::MetricsCollector;

    let mut metrics = MetricsCollector::new();
    let summary = matcher.process_to_file_with_metrics(output, &mut metrics)?;
    if cli.metrics {
        metrics.print();
    }
    if let Some(path) = &cli.metrics_json {
        metrics
            .save_to_file(path)
            .with_context(|| format!("save metrics to {}", path.display()))?;
    }
    Ok(summary)
}

#[cfg(not(feature = "metrics"))]
fn process(
    _cli: &Cli,
    matcher: &UserMatcher,
    output: &Path,
) -> Result<Option<user_matcher::RunSummary>> {
    Ok(matcher.process_to_file(output)?)
}
