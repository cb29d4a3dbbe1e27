//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Negative if `other` is after `self`.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole seconds elapsed since `earlier`, truncated, never negative.
    pub fn whole_seconds_since(&self, earlier: &Timestamp) -> u64 {
        u64::try_from(self.duration_since(earlier).num_seconds()).unwrap_or(0)
    }

    /// Creates a new timestamp offset by whole seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_datetime(Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap())
    }

    #[test]
    fn plus_secs_moves_either_way() {
        assert_eq!(at(0).plus_secs(61), at(61));
        assert_eq!(at(0).plus_secs(-5), at(-5));
        assert!(at(0) < at(0).plus_secs(1));
    }

    #[test]
    fn whole_seconds_truncates_fractions() {
        let start = at(0);
        let end = Timestamp::from_datetime(*at(90).as_datetime() + Duration::milliseconds(999));
        assert_eq!(end.whole_seconds_since(&start), 90);
    }

    #[test]
    fn whole_seconds_clamps_clock_skew_to_zero() {
        assert_eq!(at(0).whole_seconds_since(&at(10)), 0);
    }

    #[test]
    fn serializes_as_rfc3339() {
        let json = serde_json::to_string(&at(0)).unwrap();
        assert!(json.starts_with("\"2023-11-14T"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, at(0));
    }
}
