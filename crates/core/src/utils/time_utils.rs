use chrono::{DateTime, Utc};

/// Whole minutes elapsed between `start` and `now`, never negative.
pub fn minutes_since(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_minutes().max(0)
}

/// Formats an elapsed duration as `HH:MM:SS` (hours are not wrapped).
pub fn format_elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let seconds = (end - start).num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_minutes_since_clamps_future_start() {
        let now = Utc::now();
        assert_eq!(minutes_since(now + Duration::minutes(5), now), 0);
        assert_eq!(minutes_since(now - Duration::minutes(90), now), 90);
    }

    #[test]
    fn test_format_elapsed_over_a_day() {
        let start = Utc::now();
        let end = start + Duration::hours(26) + Duration::minutes(3) + Duration::seconds(9);
        assert_eq!(format_elapsed(start, end), "26:03:09");
    }
}
