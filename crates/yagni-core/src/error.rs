//! # Validation Errors
//!
//! Structured error types for every validated type in the crate, built with
//! `thiserror`. All of them are raised synchronously by a constructor; a
//! value that exists has already passed validation.
//!
//! Each variant carries the rejected input and the name of the type that
//! rejected it, so a caller at an API boundary can report the problem
//! without re-deriving it.

use thiserror::Error;

use crate::constrained::CharClass;

/// Errors raised while constructing a validated value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Enum resolution input matches no member under ASCII case folding.
    #[error("{input:?} is not a valid {type_name}")]
    NoSuchMember {
        /// Name of the enum type.
        type_name: &'static str,
        /// The rejected input, verbatim.
        input: String,
    },

    /// A constrained string failed its structural predicate.
    #[error("invalid {type_name}: {value:?} ({reason})")]
    ConstraintViolation {
        /// Name of the constrained string type.
        type_name: &'static str,
        /// The rejected input, verbatim.
        value: String,
        /// Which constraint failed.
        reason: Violation,
    },

    /// The timestamp carries no timezone offset.
    #[error("naive timestamps are not allowed: {value:?}")]
    NaiveTimestamp {
        /// The rejected input.
        value: String,
    },

    /// The timestamp carries an offset that is not explicitly UTC.
    #[error("timestamp must be in UTC timezone: {value:?} has offset {offset}")]
    NonUtcTimestamp {
        /// The rejected input.
        value: String,
        /// The offset as written or computed, e.g. `+03:00`.
        offset: String,
    },

    /// The timestamp string could not be parsed at all.
    #[error("invalid timestamp: {value:?} ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// The constraint that failed, for [`ValidationError::ConstraintViolation`].
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::ConstraintViolation { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// The specific structural constraint a constrained string failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Fewer characters than the minimum length.
    TooShort {
        /// Minimum number of characters.
        min: usize,
        /// Number of characters after normalization.
        actual: usize,
    },
    /// More characters than the maximum length.
    TooLong {
        /// Maximum number of characters.
        max: usize,
        /// Number of characters after normalization.
        actual: usize,
    },
    /// The value does not match the type's regular expression.
    Pattern {
        /// The regular expression source.
        pattern: &'static str,
    },
    /// A character does not belong to the class required at its position.
    Position {
        /// 1-based character position.
        position: usize,
        /// The class required at that position.
        expected: CharClass,
    },
}

impl Violation {
    /// True for the two length variants.
    pub fn is_length(&self) -> bool {
        matches!(self, Self::TooShort { .. } | Self::TooLong { .. })
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min, actual } => {
                write!(f, "must be at least {min} characters, got {actual}")
            }
            Self::TooLong { max, actual } => {
                write!(f, "must be at most {max} characters, got {actual}")
            }
            Self::Pattern { pattern } => write!(f, "must match {pattern}"),
            Self::Position { position, expected } => {
                write!(f, "position {position} must be {expected}")
            }
        }
    }
}
