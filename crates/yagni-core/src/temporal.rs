//! # UTC-Only Timestamps
//!
//! Defines [`UtcTimestamp`], a timestamp that can only exist if its input
//! was explicitly anchored to UTC.
//!
//! ## Construction Path
//!
//! Every input is first turned into a [`ParsedTimestamp`] (a local
//! date-time plus an optional [`ZoneOffset`]) and then checked:
//!
//! 1. no offset at all is a [`ValidationError::NaiveTimestamp`];
//! 2. an offset that is not explicitly UTC is a
//!    [`ValidationError::NonUtcTimestamp`];
//! 3. anything else is accepted.
//!
//! Non-UTC inputs are **rejected**, never converted. `Z` and `+00:00` are
//! UTC. `-00:00` is not: RFC 3339 §4.3 reserves it for "UTC time, local
//! offset unknown", which is a zero offset with a different meaning.
//!
//! String parsing sits behind the [`TimestampParser`] trait so the accepted
//! textual formats can change without touching the UTC policy.
//!
//! ## Rendering
//!
//! RFC 3339 with an explicit `+00:00` offset and fractional seconds only
//! when present, e.g. `1991-08-24T10:00:00+00:00`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Timezone information attached to a parsed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneOffset {
    /// Explicitly UTC (`Z`, `z`, `+00:00`).
    Utc,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
    /// `-00:00`: the instant is known in UTC but the local offset is not.
    Unknown,
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("+00:00"),
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Unknown => f.write_str("-00:00"),
        }
    }
}

/// A date-time as written, before the UTC policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedTimestamp {
    /// Wall-clock date and time in the input's own offset.
    pub local: NaiveDateTime,
    /// Offset information, if the input carried any.
    pub offset: Option<ZoneOffset>,
}

impl fmt::Display for ParsedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S%.f"))?;
        match self.offset {
            Some(offset) => write!(f, "{offset}"),
            None => Ok(()),
        }
    }
}

/// Turns text into a [`ParsedTimestamp`].
pub trait TimestampParser {
    /// Parse `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] when `input` is not a
    /// timestamp this parser understands.
    fn parse(&self, input: &str) -> Result<ParsedTimestamp, ValidationError>;
}

/// ISO 8601 / RFC 3339 style parser.
///
/// Accepts `YYYY-MM-DD`, a `T` or space separator, `HH:MM` with optional
/// `:SS` and fraction, then an optional `Z`/`z`, `±HH:MM`, `±HHMM` or `±HH`.
///
/// A string of ASCII digits, optionally preceded by `-`, is read as Unix
/// epoch seconds and is UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoParser;

const DATE_LEN: usize = "YYYY-MM-DD".len();

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl TimestampParser for IsoParser {
    fn parse(&self, input: &str) -> Result<ParsedTimestamp, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidTimestamp {
            value: input.to_string(),
            reason: reason.to_string(),
        };

        if let Some(secs) = epoch_digits(input) {
            let secs: i64 = secs.parse().map_err(|_| invalid("out of range Unix timestamp"))?;
            let dt = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| invalid("out of range Unix timestamp"))?;
            return Ok(ParsedTimestamp {
                local: dt.naive_utc(),
                offset: Some(ZoneOffset::Utc),
            });
        }

        let (body, offset) = split_offset(input).ok_or_else(|| invalid("malformed UTC offset"))?;

        let local = LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
            .ok_or_else(|| invalid("expected YYYY-MM-DDTHH:MM[:SS[.fraction]]"))?;

        Ok(ParsedTimestamp { local, offset })
    }
}

/// `input` if it is an optionally negative run of ASCII digits.
fn epoch_digits(input: &str) -> Option<&str> {
    let digits = input.strip_prefix('-').unwrap_or(input);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(input)
}

/// Split the trailing offset, if any, from the date-time body.
///
/// Returns `None` when something that looks like an offset is malformed.
fn split_offset(input: &str) -> Option<(&str, Option<ZoneOffset>)> {
    if let Some(body) = input.strip_suffix(|c: char| matches!(c, 'Z' | 'z')) {
        return Some((body, Some(ZoneOffset::Utc)));
    }

    // Signs inside the date part are field separators, not offsets.
    let Some(time) = input.get(DATE_LEN..) else {
        return Some((input, None));
    };
    match time.rfind(['+', '-']) {
        Some(at) => {
            let (time_body, offset) = time.split_at(at);
            let body = input.get(..DATE_LEN + time_body.len())?;
            Some((body, Some(parse_offset(offset)?)))
        }
        None => Some((input, None)),
    }
}

fn parse_offset(text: &str) -> Option<ZoneOffset> {
    let (negative, rest) = match text.strip_prefix('+') {
        Some(rest) => (false, rest),
        None => (true, text.strip_prefix('-')?),
    };
    if !rest.is_ascii() {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => rest.split_at(2),
        5 if rest.as_bytes().get(2) == Some(&b':') => (rest.get(..2)?, rest.get(3..)?),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    let seconds = hours * 3600 + minutes * 60;
    match (seconds, negative) {
        (0, false) => Some(ZoneOffset::Utc),
        (0, true) => Some(ZoneOffset::Unknown),
        (s, false) => FixedOffset::east_opt(s).map(ZoneOffset::Fixed),
        (s, true) => FixedOffset::west_opt(s).map(ZoneOffset::Fixed),
    }
}

/// A timestamp that is guaranteed to have been given in UTC.
///
/// # Construction
///
/// - [`UtcTimestamp::parse()`] / `FromStr`: from text, via [`IsoParser`].
/// - [`UtcTimestamp::parse_with()`]: from text, via any [`TimestampParser`].
/// - [`UtcTimestamp::from_parsed()`]: from an already parsed value.
/// - `From<DateTime<Utc>>`, `TryFrom<DateTime<FixedOffset>>`,
///   `TryFrom<NaiveDateTime>`: from chrono values.
/// - [`UtcTimestamp::from_epoch_secs()`]: from Unix time.
/// - [`UtcTimestamp::now()`]: the current instant.
///
/// ```
/// use yagni_core::{UtcTimestamp, ValidationError};
///
/// let ts = UtcTimestamp::parse("1991-08-24T10:00:00+00:00").unwrap();
/// assert_eq!(ts.to_string(), "1991-08-24T10:00:00+00:00");
///
/// assert!(matches!(
///     UtcTimestamp::parse("1991-08-24T10:00:00"),
///     Err(ValidationError::NaiveTimestamp { .. })
/// ));
/// assert!(matches!(
///     UtcTimestamp::parse("1991-08-24T10:00:00+03:00"),
///     Err(ValidationError::NonUtcTimestamp { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// The current instant.
    pub fn now() -> Self {
        Self(crate::time::now_utc())
    }

    /// Parse `input` with [`IsoParser`] and apply the UTC check.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidTimestamp`] if the text does not parse,
    /// [`ValidationError::NaiveTimestamp`] if it has no offset, and
    /// [`ValidationError::NonUtcTimestamp`] if the offset is not UTC.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::parse_with(&IsoParser, input)
    }

    /// Parse `input` with `parser` and apply the UTC check.
    ///
    /// # Errors
    ///
    /// See [`UtcTimestamp::parse()`].
    pub fn parse_with<P>(parser: &P, input: &str) -> Result<Self, ValidationError>
    where
        P: TimestampParser + ?Sized,
    {
        let parsed = parser.parse(input)?;
        validate(parsed, input)
    }

    /// Apply the UTC check to an already parsed value.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NaiveTimestamp`] or
    /// [`ValidationError::NonUtcTimestamp`].
    pub fn from_parsed(parsed: ParsedTimestamp) -> Result<Self, ValidationError> {
        validate(parsed, &parsed.to_string())
    }

    /// Create a timestamp from Unix epoch seconds, which are UTC by definition.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if `secs` is outside
    /// the representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "out of range Unix timestamp".to_string(),
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unwrap into the inner `DateTime<Utc>`.
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// RFC 3339 with an explicit `+00:00` offset.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

fn validate(parsed: ParsedTimestamp, value: &str) -> Result<UtcTimestamp, ValidationError> {
    match parsed.offset {
        Some(ZoneOffset::Utc) => Ok(UtcTimestamp(Utc.from_utc_datetime(&parsed.local))),
        Some(ZoneOffset::Fixed(offset)) if offset.local_minus_utc() == 0 => {
            Ok(UtcTimestamp(Utc.from_utc_datetime(&parsed.local)))
        }
        Some(offset) => {
            tracing::debug!(%offset, "rejected non-UTC timestamp");
            Err(ValidationError::NonUtcTimestamp {
                value: value.to_string(),
                offset: offset.to_string(),
            })
        }
        None => {
            tracing::debug!("rejected naive timestamp");
            Err(ValidationError::NaiveTimestamp {
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for UtcTimestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UtcTimestamp {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DateTime<Utc>> for UtcTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl TryFrom<DateTime<FixedOffset>> for UtcTimestamp {
    type Error = ValidationError;

    fn try_from(dt: DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Self::from_parsed(ParsedTimestamp {
            local: dt.naive_local(),
            offset: Some(ZoneOffset::Fixed(*dt.offset())),
        })
    }
}

impl TryFrom<NaiveDateTime> for UtcTimestamp {
    type Error = ValidationError;

    fn try_from(local: NaiveDateTime) -> Result<Self, Self::Error> {
        Self::from_parsed(ParsedTimestamp {
            local,
            offset: None,
        })
    }
}

impl From<UtcTimestamp> for DateTime<Utc> {
    fn from(ts: UtcTimestamp) -> Self {
        ts.0
    }
}

impl Serialize for UtcTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

/// Accepts RFC 3339 strings (through the UTC check) and integer Unix
/// timestamps.
///
/// Telling the two apart needs `deserialize_any`, which only self-describing
/// formats support. Formats that are not human-readable are asked for a
/// string, which is what [`Serialize`] writes.
impl<'de> Deserialize<'de> for UtcTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl serde::de::Visitor<'_> for TimestampVisitor {
            type Value = UtcTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a UTC timestamp string or Unix seconds")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                UtcTimestamp::parse(v).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                UtcTimestamp::from_epoch_secs(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let secs = i64::try_from(v).map_err(E::custom)?;
                UtcTimestamp::from_epoch_secs(secs).map_err(E::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(TimestampVisitor)
        } else {
            deserializer.deserialize_str(TimestampVisitor)
        }
    }
}
