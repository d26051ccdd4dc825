//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Current Unix timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds between `created` and `now`, floored at zero
///
/// Producer and consumer clocks can disagree; an event stamped in the
/// future counts as zero lag.
pub fn lag_millis(created: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - created).num_milliseconds().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_lag_millis() {
        let now = Utc::now();
        assert_eq!(lag_millis(now - Duration::milliseconds(1500), now), 1500);
        assert_eq!(lag_millis(now, now), 0);
    }

    #[test]
    fn test_lag_millis_clock_skew_is_zero() {
        let now = Utc::now();
        assert_eq!(lag_millis(now + Duration::seconds(3), now), 0);
    }
}
