//! # yagni-cli: Command-Line Front End for yagni Validated Types
//!
//! Provides the `yagni` binary. It is a boundary in the sense of the core
//! crate: raw input comes in, and every rejection is reported with the type
//! and the reason rather than replaced with a default.
//!
//! ## Subcommands
//!
//! - `yagni check <KIND> <VALUE>...`: validate values and print their
//!   canonical form.
//! - `yagni now`: print the current UTC time.
//!
//! ```bash
//! yagni check ssn 123-45-6789 12345678
//! yagni check MBI --json 1ax0Y67Dw34
//! yagni check utc-timestamp --file timestamps.txt
//! yagni now --epoch
//! ```

pub mod check;
pub mod now;
