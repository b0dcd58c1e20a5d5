//! # yagni CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yagni_cli::check::{run_check, CheckArgs};
use yagni_cli::now::{run_now, NowArgs};

/// yagni: validate SSNs, MBIs, non-empty strings and UTC timestamps.
#[derive(Parser, Debug)]
#[command(name = "yagni", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate values and print their canonical form.
    Check(CheckArgs),

    /// Print the current UTC time.
    Now(NowArgs),
}

/// Log filter: `RUST_LOG` when set, otherwise derived from `-v`.
fn log_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Now(args) => run_now(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yagni_cli::check::Kind;

    #[test]
    fn cli_parse_check_values() {
        let cli = Cli::try_parse_from(["yagni", "check", "ssn", "123-45-6789", "12345678"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.kind, Kind::Ssn);
        assert_eq!(args.values, vec!["123-45-6789", "12345678"]);
        assert!(!args.json);
        assert!(args.file.is_none());
    }

    #[test]
    fn cli_parse_check_kind_any_case() {
        let cli = Cli::try_parse_from(["yagni", "check", "UTC-Timestamp", "--json", "x"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.kind, Kind::UtcTimestamp);
        assert!(args.json);
    }

    #[test]
    fn cli_parse_check_file() {
        let cli = Cli::try_parse_from(["yagni", "check", "mbi", "--file", "-"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.file.as_deref(), Some(std::path::Path::new("-")));
        assert!(args.values.is_empty());
    }

    #[test]
    fn cli_parse_check_dash_leading_values() {
        let cli =
            Cli::try_parse_from(["yagni", "check", "ssn", "-123456789", "123456789-", "-"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.values, vec!["-123456789", "123456789-", "-"]);
    }

    #[test]
    fn cli_parse_check_flags_before_dash_leading_value() {
        let cli = Cli::try_parse_from(["yagni", "check", "ssn", "--json", "-123456789"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert!(args.json);
        assert_eq!(args.values, vec!["-123456789"]);
    }

    #[test]
    fn cli_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["yagni", "check", "passport", "X1"]).is_err());
    }

    #[test]
    fn cli_parse_now_epoch() {
        let cli = Cli::try_parse_from(["yagni", "now", "--epoch"]).unwrap();
        assert!(matches!(cli.command, Commands::Now(NowArgs { epoch: true })));
    }

    #[test]
    fn cli_verbose_is_global() {
        let cli = Cli::try_parse_from(["yagni", "now", "-vv", "--log-json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["yagni"]).is_err());
    }
}
