//! # Now Subcommand
//!
//! Prints the current instant as a UTC timestamp.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use yagni_core::UtcTimestamp;

/// Arguments for the now subcommand.
#[derive(Args, Debug)]
pub struct NowArgs {
    /// Print Unix epoch seconds instead of RFC 3339.
    #[arg(long)]
    pub epoch: bool,
}

/// Render `ts` the way the now subcommand prints it.
pub fn render(ts: &UtcTimestamp, args: &NowArgs) -> String {
    if args.epoch {
        ts.epoch_secs().to_string()
    } else {
        ts.to_string()
    }
}

/// Execute the now subcommand.
pub fn run_now(args: &NowArgs) -> Result<u8> {
    let line = render(&UtcTimestamp::now(), args);
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rfc3339_with_offset() {
        let ts = UtcTimestamp::from_epoch_secs(683_028_000).unwrap();
        assert_eq!(
            render(&ts, &NowArgs { epoch: false }),
            "1991-08-24T10:00:00+00:00"
        );
    }

    #[test]
    fn renders_epoch() {
        let ts = UtcTimestamp::from_epoch_secs(683_028_000).unwrap();
        assert_eq!(render(&ts, &NowArgs { epoch: true }), "683028000");
    }
}
