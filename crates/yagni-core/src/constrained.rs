//! # Constrained Strings
//!
//! A single generic smart constructor, [`ConstrainedString`], parametrized by
//! a [`StringRule`]. The rule is a declaration: a name, an ordered
//! normalization pipeline, when that pipeline runs relative to validation,
//! and a structural predicate made of up to three parts:
//!
//! 1. a regular expression matched against the whole value,
//! 2. a minimum and/or maximum length in characters,
//! 3. a per-position [`CharClass`] list.
//!
//! The parts are evaluated in that order and the first failure is reported
//! as a [`Violation`].
//!
//! ## Invariant
//!
//! A `ConstrainedString<R>` holds exactly the normalized string and that
//! string satisfies `R`'s predicate. There is no unchecked constructor and
//! no mutation path.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ValidationError, Violation};

/// A single normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalize {
    /// Strip surrounding whitespace.
    Trim,
    /// Remove the separator wherever it sits between two non-separator
    /// characters. Leading, trailing and repeated separators are kept, so
    /// the predicate still sees (and rejects) them.
    StripSeparator(char),
    /// Upper-case the whole value.
    Uppercase,
    /// Lower-case the whole value.
    Lowercase,
}

impl Normalize {
    /// Apply this step to `value`.
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Trim => value.trim().to_string(),
            Self::StripSeparator(sep) => strip_separator(value, sep),
            Self::Uppercase => value.to_uppercase(),
            Self::Lowercase => value.to_lowercase(),
        }
    }
}

fn strip_separator(value: &str, sep: char) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        let separates = c == sep
            && i.checked_sub(1)
                .and_then(|prev| chars.get(prev))
                .is_some_and(|p| *p != sep)
            && chars.get(i + 1).is_some_and(|n| *n != sep);
        if !separates {
            out.push(c);
        }
    }
    out
}

/// When a rule's normalization pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NormalizeOrder {
    /// Normalize first, then check the predicate against the normalized value.
    #[default]
    BeforeValidation,
    /// Check the raw value, normalize, then check the normalized value again.
    AfterValidation,
}

/// Character class required at one position of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `0`-`9`.
    Digit,
    /// `1`-`9`.
    NonZeroDigit,
    /// An ASCII letter not listed in `except` (compared case-insensitively).
    Letter {
        /// Letters that are not allowed.
        except: &'static str,
    },
    /// A digit, or an ASCII letter not listed in `except`.
    LetterOrDigit {
        /// Letters that are not allowed.
        except: &'static str,
    },
}

impl CharClass {
    /// Whether `c` belongs to this class.
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::NonZeroDigit => matches!(c, '1'..='9'),
            Self::Letter { except } => is_allowed_letter(c, except),
            Self::LetterOrDigit { except } => c.is_ascii_digit() || is_allowed_letter(c, except),
        }
    }
}

fn is_allowed_letter(c: char, except: &str) -> bool {
    c.is_ascii_alphabetic() && !except.chars().any(|e| e.eq_ignore_ascii_case(&c))
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit => f.write_str("a digit"),
            Self::NonZeroDigit => f.write_str("a digit 1-9"),
            Self::Letter { except } if except.is_empty() => f.write_str("a letter"),
            Self::Letter { except } => write!(f, "a letter other than {except}"),
            Self::LetterOrDigit { except } if except.is_empty() => {
                f.write_str("a digit or a letter")
            }
            Self::LetterOrDigit { except } => {
                write!(f, "a digit or a letter other than {except}")
            }
        }
    }
}

/// Declarative validation rule for a [`ConstrainedString`].
///
/// Implemented by uninhabited marker types; every item except [`NAME`]
/// has a permissive default.
///
/// [`POSITIONS`] only constrains as many characters as it lists, so rules
/// that use it should also fix the length.
///
/// [`NAME`]: StringRule::NAME
/// [`POSITIONS`]: StringRule::POSITIONS
pub trait StringRule {
    /// Type name reported in errors.
    const NAME: &'static str;
    /// Normalization steps, applied in order.
    const NORMALIZE: &'static [Normalize] = &[];
    /// When [`NORMALIZE`](StringRule::NORMALIZE) runs.
    const ORDER: NormalizeOrder = NormalizeOrder::BeforeValidation;
    /// Minimum length in characters.
    const MIN_LENGTH: Option<usize> = None;
    /// Maximum length in characters.
    const MAX_LENGTH: Option<usize> = None;
    /// Required class for each leading character position.
    const POSITIONS: &'static [CharClass] = &[];

    /// Regular expression the whole value must match.
    fn pattern() -> Option<&'static Regex> {
        None
    }
}

fn normalize<R: StringRule>(raw: &str) -> String {
    R::NORMALIZE
        .iter()
        .fold(raw.to_string(), |value, step| step.apply(&value))
}

fn check<R: StringRule>(value: &str) -> Result<(), Violation> {
    if let Some(re) = R::pattern() {
        if !re.is_match(value) {
            return Err(Violation::Pattern {
                pattern: re.as_str(),
            });
        }
    }

    let actual = value.chars().count();
    if let Some(min) = R::MIN_LENGTH {
        if actual < min {
            return Err(Violation::TooShort { min, actual });
        }
    }
    if let Some(max) = R::MAX_LENGTH {
        if actual > max {
            return Err(Violation::TooLong { max, actual });
        }
    }

    for (index, (c, class)) in value.chars().zip(R::POSITIONS).enumerate() {
        if !class.matches(c) {
            return Err(Violation::Position {
                position: index + 1,
                expected: *class,
            });
        }
    }

    Ok(())
}

fn reject<R: StringRule>(raw: &str, reason: Violation) -> ValidationError {
    tracing::debug!(type_name = R::NAME, %reason, "rejected constrained string");
    ValidationError::ConstraintViolation {
        type_name: R::NAME,
        value: raw.to_string(),
        reason,
    }
}

/// A string that satisfies the rule `R`.
///
/// Equality, ordering and hashing use the stored (normalized) value.
pub struct ConstrainedString<R> {
    value: String,
    rule: PhantomData<fn() -> R>,
}

impl<R: StringRule> ConstrainedString<R> {
    /// Validate and normalize `value` according to `R`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConstraintViolation`] naming the first
    /// constraint the value fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let normalized = match R::ORDER {
            NormalizeOrder::BeforeValidation => {
                let normalized = normalize::<R>(&raw);
                check::<R>(&normalized).map_err(|reason| reject::<R>(&raw, reason))?;
                normalized
            }
            NormalizeOrder::AfterValidation => {
                check::<R>(&raw).map_err(|reason| reject::<R>(&raw, reason))?;
                let normalized = normalize::<R>(&raw);
                check::<R>(&normalized).map_err(|reason| reject::<R>(&raw, reason))?;
                normalized
            }
        };
        Ok(Self {
            value: normalized,
            rule: PhantomData,
        })
    }

    /// The rule's type name.
    pub fn type_name() -> &'static str {
        R::NAME
    }
}

impl<R> ConstrainedString<R> {
    /// Access the stored value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume the value and return the stored string.
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<R> Clone for ConstrainedString<R> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            rule: PhantomData,
        }
    }
}

impl<R> PartialEq for ConstrainedString<R> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<R> Eq for ConstrainedString<R> {}

impl<R> PartialOrd for ConstrainedString<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Ord for ConstrainedString<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<R> Hash for ConstrainedString<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<R: StringRule> fmt::Debug for ConstrainedString<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(R::NAME).field(&self.value).finish()
    }
}

impl<R> fmt::Display for ConstrainedString<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<R> AsRef<str> for ConstrainedString<R> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<R: StringRule> FromStr for ConstrainedString<R> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<R: StringRule> TryFrom<String> for ConstrainedString<R> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<R: StringRule> TryFrom<&str> for ConstrainedString<R> {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<R> From<ConstrainedString<R>> for String {
    fn from(value: ConstrainedString<R>) -> Self {
        value.value
    }
}

impl<R> Serialize for ConstrainedString<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// Deserializes as a plain string, then routes through
/// [`ConstrainedString::new`] so invalid values are rejected at the boundary.
impl<'de, R: StringRule> Deserialize<'de> for ConstrainedString<R> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static PIN_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9](-?[0-9]){3}$").unwrap());

    /// Four-digit PIN checked on the raw input, dashes removed afterwards.
    enum PinRule {}

    impl StringRule for PinRule {
        const NAME: &'static str = "Pin";
        const NORMALIZE: &'static [Normalize] = &[Normalize::StripSeparator('-')];
        const ORDER: NormalizeOrder = NormalizeOrder::AfterValidation;

        fn pattern() -> Option<&'static Regex> {
            Some(&*PIN_PATTERN)
        }
    }

    /// Lower-case-only tag that upper-cases after validation, which breaks
    /// its own predicate.
    enum ShoutRule {}

    static LOWER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+$").unwrap());

    impl StringRule for ShoutRule {
        const NAME: &'static str = "Shout";
        const NORMALIZE: &'static [Normalize] = &[Normalize::Uppercase];
        const ORDER: NormalizeOrder = NormalizeOrder::AfterValidation;

        fn pattern() -> Option<&'static Regex> {
            Some(&*LOWER)
        }
    }

    enum CodeRule {}

    impl StringRule for CodeRule {
        const NAME: &'static str = "Code";
        const NORMALIZE: &'static [Normalize] = &[Normalize::Trim, Normalize::Lowercase];
        const MIN_LENGTH: Option<usize> = Some(2);
        const MAX_LENGTH: Option<usize> = Some(3);
        const POSITIONS: &'static [CharClass] = &[
            CharClass::Letter { except: "x" },
            CharClass::Digit,
            CharClass::LetterOrDigit { except: "" },
        ];
    }

    type Pin = ConstrainedString<PinRule>;
    type Shout = ConstrainedString<ShoutRule>;
    type Code = ConstrainedString<CodeRule>;

    #[test]
    fn strip_separator_only_between_characters() {
        let step = Normalize::StripSeparator('-');
        assert_eq!(step.apply("12-34"), "1234");
        assert_eq!(step.apply("1-2-3-4"), "1234");
        assert_eq!(step.apply("-1234"), "-1234");
        assert_eq!(step.apply("1234-"), "1234-");
        assert_eq!(step.apply("12--34"), "12--34");
        assert_eq!(step.apply(""), "");
        assert_eq!(step.apply("-"), "-");
    }

    #[test]
    fn trim_and_case_steps() {
        assert_eq!(Normalize::Trim.apply("  a b \t"), "a b");
        assert_eq!(Normalize::Uppercase.apply("aBc"), "ABC");
        assert_eq!(Normalize::Lowercase.apply("aBc"), "abc");
    }

    #[test]
    fn after_validation_checks_raw_input() {
        assert_eq!(Pin::new("1-234").unwrap().as_str(), "1234");
        assert_eq!(Pin::new("1-2-3-4").unwrap().as_str(), "1234");
        let err = Pin::new("-1234").unwrap_err();
        assert!(matches!(err.violation(), Some(Violation::Pattern { .. })));
    }

    #[test]
    fn after_validation_rechecks_normalized_value() {
        let err = Shout::new("abc").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConstraintViolation {
                type_name: "Shout",
                reason: Violation::Pattern { .. },
                ..
            }
        ));
    }

    #[test]
    fn before_validation_normalizes_first() {
        let code = Code::new("  A1b ").unwrap();
        assert_eq!(code.as_str(), "a1b");
    }

    #[test]
    fn length_is_checked_before_positions() {
        let err = Code::new("a").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::TooShort { min: 2, actual: 1 })
        );
        let err = Code::new("a1b2").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::TooLong { max: 3, actual: 4 })
        );
    }

    #[test]
    fn position_violation_is_one_based() {
        let err = Code::new("ab").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::Position {
                position: 2,
                expected: CharClass::Digit
            })
        );
        let err = Code::new("X1").unwrap_err();
        assert_eq!(
            err.violation(),
            Some(&Violation::Position {
                position: 1,
                expected: CharClass::Letter { except: "x" }
            })
        );
    }

    #[test]
    fn error_keeps_raw_input() {
        let err = Code::new("  ZZZZ ").unwrap_err();
        match err {
            ValidationError::ConstraintViolation { value, .. } => assert_eq!(value, "  ZZZZ "),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn char_class_membership() {
        assert!(CharClass::Digit.matches('0'));
        assert!(!CharClass::NonZeroDigit.matches('0'));
        assert!(CharClass::NonZeroDigit.matches('9'));
        assert!(!CharClass::Letter { except: "SL" }.matches('s'));
        assert!(CharClass::Letter { except: "SL" }.matches('A'));
        assert!(!CharClass::Letter { except: "" }.matches('1'));
        assert!(CharClass::LetterOrDigit { except: "SL" }.matches('1'));
        assert!(!CharClass::LetterOrDigit { except: "SL" }.matches('L'));
        assert!(!CharClass::Letter { except: "" }.matches('é'));
    }

    #[test]
    fn equality_and_ordering_use_stored_value() {
        assert_eq!(Code::new("A1").unwrap(), Code::new(" a1").unwrap());
        assert!(Code::new("a1").unwrap() < Code::new("b1").unwrap());
    }

    #[test]
    fn debug_uses_rule_name() {
        let code = Code::new("a1").unwrap();
        assert_eq!(format!("{code:?}"), "Code(\"a1\")");
        assert_eq!(Code::type_name(), "Code");
    }

    #[test]
    fn conversions() {
        let pin: Pin = "12-34".parse().unwrap();
        assert_eq!(pin.to_string(), "1234");
        let pin = Pin::try_from("1234".to_string()).unwrap();
        let s: String = pin.clone().into();
        assert_eq!(s, "1234");
        assert_eq!(pin.as_ref(), "1234");
        assert_eq!(pin.into_inner(), "1234");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let pin: Pin = serde_json::from_str("\"1-234\"").unwrap();
        assert_eq!(serde_json::to_string(&pin).unwrap(), "\"1234\"");
        assert!(serde_json::from_str::<Pin>("\"12345\"").is_err());
    }
}
