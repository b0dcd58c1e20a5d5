//! # Identifier Newtypes
//!
//! Concrete [`ConstrainedString`] instantiations. Each type is a rule
//! declaration plus a type alias; validation, normalization, comparison and
//! serde support all come from the generic mechanism.
//!
//! | Type | Normalization | Predicate |
//! |------|---------------|-----------|
//! | [`Ssn`] | strip `-` separators | 9 ASCII digits |
//! | [`Mbi`] | upper-case | 11 positional character classes |
//! | [`NonEmptyStr`] | trim whitespace | at least 1 character |
//!
//! ## References
//!
//! - SSN: US Social Security Number, `AAA-GG-SSSS`.
//! - MBI: CMS Medicare Beneficiary Identifier,
//!   <https://www.cms.gov/medicare/new-medicare-card/understanding-the-mbi-with-format.pdf>

use std::sync::LazyLock;

use regex::Regex;

use crate::constrained::{CharClass, ConstrainedString, Normalize, StringRule};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is a valid regex"));

// ---------------------------------------------------------------------------
// SSN
// ---------------------------------------------------------------------------

/// Rule for [`Ssn`].
#[derive(Debug)]
pub enum SsnRule {}

impl StringRule for SsnRule {
    const NAME: &'static str = "Ssn";
    const NORMALIZE: &'static [Normalize] = &[Normalize::StripSeparator('-')];
    const MIN_LENGTH: Option<usize> = Some(SSN_LENGTH);
    const MAX_LENGTH: Option<usize> = Some(SSN_LENGTH);

    fn pattern() -> Option<&'static Regex> {
        Some(&*DIGITS)
    }
}

const SSN_LENGTH: usize = 9;

/// US Social Security Number.
///
/// Stored as 9 digits without separators. The constructor accepts single
/// dashes between any two digits, so both `"123-45-6789"` and
/// `"12-3-4-5-6-7-8-9"` become `"123456789"`.
///
/// # Validation
///
/// - Exactly 9 ASCII digits once separators are removed
/// - Leading, trailing or doubled dashes are rejected
///
/// ```
/// use yagni_core::Ssn;
///
/// let ssn = Ssn::new("123-45-6789").unwrap();
/// assert_eq!(ssn.as_str(), "123456789");
/// assert!(Ssn::new("12345678").is_err());
/// ```
pub type Ssn = ConstrainedString<SsnRule>;

impl ConstrainedString<SsnRule> {
    /// Number of digits in an SSN.
    pub const LENGTH: usize = SSN_LENGTH;

    /// Render in the conventional `AAA-GG-SSSS` grouping.
    pub fn formatted(&self) -> String {
        let (area, rest) = self.as_str().split_at(3);
        let (group, serial) = rest.split_at(2);
        format!("{area}-{group}-{serial}")
    }
}

// ---------------------------------------------------------------------------
// MBI
// ---------------------------------------------------------------------------

/// Letters never used in an MBI because they read like digits or each other.
pub const MBI_EXCLUDED_LETTERS: &str = "SLOIBZ";

const ALPHA: CharClass = CharClass::Letter {
    except: MBI_EXCLUDED_LETTERS,
};
const ALNUM: CharClass = CharClass::LetterOrDigit {
    except: MBI_EXCLUDED_LETTERS,
};
const NUM: CharClass = CharClass::Digit;

/// Rule for [`Mbi`].
#[derive(Debug)]
pub enum MbiRule {}

impl StringRule for MbiRule {
    const NAME: &'static str = "Mbi";
    const NORMALIZE: &'static [Normalize] = &[Normalize::Uppercase];
    const MIN_LENGTH: Option<usize> = Some(MBI_LENGTH);
    const MAX_LENGTH: Option<usize> = Some(MBI_LENGTH);
    const POSITIONS: &'static [CharClass] = &[
        CharClass::NonZeroDigit,
        ALPHA,
        ALNUM,
        NUM,
        ALPHA,
        ALNUM,
        NUM,
        ALPHA,
        ALPHA,
        NUM,
        NUM,
    ];
}

const MBI_LENGTH: usize = 11;

/// Medicare Beneficiary Identifier.
///
/// Eleven characters, stored upper-case. Position by position:
///
/// | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 |
/// |---|---|---|---|---|---|---|---|---|----|----|
/// | 1-9 | A | A/N | N | A | A/N | N | A | A | N | N |
///
/// where `N` is a digit and `A` a letter other than `S L O I B Z`.
///
/// ```
/// use yagni_core::Mbi;
///
/// let mbi = Mbi::new("1ax0Y67Dw34").unwrap();
/// assert_eq!(mbi.as_str(), "1AX0Y67DW34");
/// assert!(Mbi::new("0AX0Y67DW34").is_err());
/// ```
pub type Mbi = ConstrainedString<MbiRule>;

impl ConstrainedString<MbiRule> {
    /// Number of characters in an MBI.
    pub const LENGTH: usize = MBI_LENGTH;
}

// ---------------------------------------------------------------------------
// Non-empty string
// ---------------------------------------------------------------------------

/// Rule for [`NonEmptyStr`].
#[derive(Debug)]
pub enum NonEmptyRule {}

impl StringRule for NonEmptyRule {
    const NAME: &'static str = "NonEmptyStr";
    const NORMALIZE: &'static [Normalize] = &[Normalize::Trim];
    const MIN_LENGTH: Option<usize> = Some(1);
}

/// A string with surrounding whitespace stripped and at least one
/// character left.
pub type NonEmptyStr = ConstrainedString<NonEmptyRule>;
