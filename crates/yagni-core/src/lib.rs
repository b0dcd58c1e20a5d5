//! # yagni-core: Validated Scalar Types
//!
//! Values that can only exist in a form that already satisfies their domain
//! constraint. Every type here has validating constructors and no other way
//! in; once built, a value is immutable.
//!
//! ## Key Design Principles
//!
//! 1. **One generic smart constructor.** [`ConstrainedString`] is
//!    parametrized by a declarative [`StringRule`] (normalization pipeline,
//!    length bounds, regex, per-position character classes). [`Ssn`],
//!    [`Mbi`] and [`NonEmptyStr`] are rule declarations plus type aliases.
//!
//! 2. **Explicit rendering for enums.** [`CanonicalEnum`] members render via
//!    `as_str()`/`Display` and resolve ignoring ASCII case. Declare them with
//!    [`canonical_enum!`].
//!
//! 3. **UTC-only timestamps.** [`UtcTimestamp`] rejects naive and non-UTC
//!    input with distinct errors and never converts between zones.
//!
//! 4. **Structured errors.** Every rejection is a [`ValidationError`] that
//!    names the type and the rejected input.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. Compiled regex literals
//!   are the only `expect`.
//! - Serde support routes deserialization through the validating
//!   constructors.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod canonical;
pub mod constrained;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod time;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalEnum;
pub use constrained::{CharClass, ConstrainedString, Normalize, NormalizeOrder, StringRule};
pub use error::{ValidationError, Violation};
pub use identity::{Mbi, MbiRule, NonEmptyRule, NonEmptyStr, Ssn, SsnRule};
pub use temporal::{IsoParser, ParsedTimestamp, TimestampParser, UtcTimestamp, ZoneOffset};
pub use time::now_utc;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
