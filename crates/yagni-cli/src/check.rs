//! # Check Subcommand
//!
//! Validates each value against one of the validated types and prints
//! either its canonical form or the reason it was rejected. Exits with
//! status 1 if any value is rejected.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use yagni_core::{canonical_enum, Mbi, NonEmptyStr, Ssn, UtcTimestamp, ValidationError};

canonical_enum! {
    /// Validated type to check values against.
    pub enum Kind {
        /// US Social Security Number.
        Ssn => "ssn",
        /// Medicare Beneficiary Identifier.
        Mbi => "mbi",
        /// Whitespace-trimmed, non-empty string.
        NonEmpty => "non-empty",
        /// Timestamp with an explicit UTC offset.
        UtcTimestamp => "utc-timestamp",
    }
}

impl Kind {
    /// Validate `input` and return its canonical rendering.
    pub fn canonicalize(self, input: &str) -> Result<String, ValidationError> {
        match self {
            Self::Ssn => Ssn::new(input).map(|v| v.to_string()),
            Self::Mbi => Mbi::new(input).map(|v| v.to_string()),
            Self::NonEmpty => NonEmptyStr::new(input).map(|v| v.to_string()),
            Self::UtcTimestamp => UtcTimestamp::parse(input).map(|v| v.to_string()),
        }
    }
}

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Type to validate against: ssn, mbi, non-empty or utc-timestamp
    /// (case-insensitive).
    pub kind: Kind,

    /// Values to check. Values may start with `-`, so pass flags before them.
    #[arg(allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Also read values from a file, one per line. Use `-` for stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print one JSON object per value instead of tab-separated text.
    #[arg(long)]
    pub json: bool,
}

/// Outcome of checking one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// The type the value was checked against.
    pub kind: Kind,
    /// The value as given.
    pub input: String,
    /// Whether the value was accepted.
    pub valid: bool,
    /// Canonical rendering, for accepted values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Rejection reason, for rejected values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check a single value.
pub fn check_value(kind: Kind, input: &str) -> CheckReport {
    match kind.canonicalize(input) {
        Ok(canonical) => CheckReport {
            kind,
            input: input.to_string(),
            valid: true,
            canonical: Some(canonical),
            error: None,
        },
        Err(e) => CheckReport {
            kind,
            input: input.to_string(),
            valid: false,
            canonical: None,
            error: Some(e.to_string()),
        },
    }
}

/// Write one report as a line of text or JSON.
pub fn write_report(out: &mut impl Write, report: &CheckReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report).context("failed to encode report")?;
        writeln!(out)?;
    } else if let Some(canonical) = &report.canonical {
        writeln!(out, "ok\t{}\t{canonical}", report.input)?;
    } else {
        let error = report.error.as_deref().unwrap_or_default();
        writeln!(out, "invalid\t{}\t{error}", report.input)?;
    }
    Ok(())
}

/// Gather the values named on the command line and in `--file`.
pub fn collect_values(args: &CheckArgs) -> Result<Vec<String>> {
    let mut values = args.values.clone();
    if let Some(path) = &args.file {
        values.extend(read_lines(path)?);
    }
    if values.is_empty() {
        bail!("no values to check; pass them as arguments or with --file");
    }
    Ok(values)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if path == Path::new("-") {
        return io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("failed to read values from stdin");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<io::Result<_>>()
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Check `values` and write a report for each to `out`.
///
/// Returns the process exit code: 0 if every value was accepted, 1 otherwise.
pub fn check_all(kind: Kind, values: &[String], json: bool, out: &mut impl Write) -> Result<u8> {
    let mut rejected = 0usize;
    for value in values {
        let report = check_value(kind, value);
        if !report.valid {
            rejected += 1;
        }
        write_report(out, &report, json)?;
    }
    tracing::info!(%kind, checked = values.len(), rejected, "check complete");
    Ok(u8::from(rejected > 0))
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let values = collect_values(args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    check_all(args.kind, &values, args.json, &mut out)
}
