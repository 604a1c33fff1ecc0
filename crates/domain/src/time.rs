//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for debounce deadlines and event times.
pub type Timestamp = DateTime<Utc>;

/// Signed span of time between two [`Timestamp`]s (cool-down windows).
pub type Duration = TimeDelta;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Build a [`Duration`] from a number of milliseconds.
#[must_use]
pub fn millis(ms: u64) -> Duration {
    TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// `ts + by`, clamped to the representable range instead of panicking.
#[must_use]
pub fn saturating_add(ts: Timestamp, by: Duration) -> Timestamp {
    ts.checked_add_signed(by).unwrap_or(if by < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_clamp_instead_of_overflowing() {
        let ts = now();
        assert_eq!(saturating_add(ts, millis(3000)), ts + TimeDelta::seconds(3));
        assert_eq!(
            saturating_add(ts, millis(10_000_000_000_000_000)),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn should_build_duration_from_millis() {
        assert_eq!(millis(3000), TimeDelta::seconds(3));
    }
}
