//! # Current Time
//!
//! Timezone-aware replacement for "utcnow"-style helpers that return a naive
//! value. Everything this crate hands out carries its UTC offset.

use chrono::{DateTime, Utc};

/// The current instant, as a UTC-aware `DateTime`.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_utc_has_zero_offset() {
        let now = now_utc();
        assert!(now.to_rfc3339().ends_with("+00:00"));
    }

    #[test]
    fn now_utc_is_monotonic_enough() {
        let a = now_utc();
        let b = now_utc();
        assert!(b >= a);
    }
}
