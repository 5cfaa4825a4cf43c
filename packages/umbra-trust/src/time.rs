//! Wall-clock helpers shared by token issuance and verification.
//!
//! Token claims carry JWT NumericDates, i.e. whole seconds since the Unix
//! epoch, so everything here works in seconds.

/// Returns the current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Adds a signed duration to a Unix timestamp, saturating at the `i64` bounds.
pub fn offset_timestamp(timestamp: i64, delta: chrono::Duration) -> i64 {
    timestamp.saturating_add(delta.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_timestamp_is_reasonable() {
        let ts = now_timestamp();
        // Should be after 2024-01-01 (1704067200)
        assert!(ts > 1704067200, "Timestamp {} is too old", ts);
        // Should be before 2100-01-01 (4102444800)
        assert!(ts < 4102444800, "Timestamp {} is too far in future", ts);
    }

    #[test]
    fn test_offset_timestamp_handles_negative_durations() {
        assert_eq!(offset_timestamp(1_000, chrono::Duration::minutes(-2)), 880);
        assert_eq!(offset_timestamp(1_000, chrono::Duration::hours(1)), 4_600);
    }

    #[test]
    fn test_offset_timestamp_saturates() {
        assert_eq!(offset_timestamp(i64::MAX - 1, chrono::Duration::seconds(10)), i64::MAX);
    }
}
