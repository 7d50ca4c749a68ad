//! Human-readable rendering of signed millisecond deltas.

pub const ONE_MILLISECOND_MS: i64 = 1;
pub const ONE_SECOND_MS: i64 = 1_000;
pub const ONE_MINUTE_MS: i64 = 60 * ONE_SECOND_MS;
pub const ONE_HOUR_MS: i64 = 60 * ONE_MINUTE_MS;
pub const ONE_DAY_MS: i64 = 24 * ONE_HOUR_MS;
pub const ONE_WEEK_MS: i64 = 7 * ONE_DAY_MS;
pub const ONE_MONTH_MS: i64 = 30 * ONE_DAY_MS;
pub const ONE_YEAR_MS: i64 = 365 * ONE_DAY_MS;

/// Largest first.
const UNITS: &[(i64, &str)] = &[
    (ONE_YEAR_MS, "year"),
    (ONE_MONTH_MS, "month"),
    (ONE_WEEK_MS, "week"),
    (ONE_DAY_MS, "day"),
    (ONE_HOUR_MS, "hour"),
    (ONE_MINUTE_MS, "minute"),
    (ONE_SECOND_MS, "second"),
    (ONE_MILLISECOND_MS, "millisecond"),
];

/// Format `delta_ms` as "in 3 days" / "5 minutes ago".
///
/// `unit_ms` is the smallest unit worth showing; anything shorter reads as
/// "now". The count is truncated, so 119 seconds is "in 1 minute".
pub fn human_duration(delta_ms: i64, unit_ms: i64) -> String {
    let magnitude = delta_ms.unsigned_abs();
    let min_unit = unit_ms.max(ONE_MILLISECOND_MS).unsigned_abs();

    if magnitude < min_unit {
        return "now".to_string();
    }

    let (size, label) = UNITS
        .iter()
        .map(|&(size, label)| (size.unsigned_abs(), label))
        .find(|&(size, _)| size <= magnitude && size >= min_unit)
        // unit_ms larger than a year, or between two named units
        .unwrap_or_else(|| {
            UNITS
                .iter()
                .map(|&(size, label)| (size.unsigned_abs(), label))
                .find(|&(size, _)| size <= magnitude)
                .unwrap_or((1, "millisecond"))
        });

    let count = magnitude / size;
    let plural = if count == 1 { "" } else { "s" };

    if delta_ms > 0 {
        format!("in {count} {label}{plural}")
    } else {
        format!("{count} {label}{plural} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_and_past_framing() {
        assert_eq!(human_duration(3 * ONE_DAY_MS, ONE_SECOND_MS), "in 3 days");
        assert_eq!(human_duration(-5 * ONE_MINUTE_MS, ONE_SECOND_MS), "5 minutes ago");
    }

    #[test]
    fn test_singular_and_truncation() {
        assert_eq!(human_duration(ONE_HOUR_MS, ONE_SECOND_MS), "in 1 hour");
        assert_eq!(human_duration(119 * ONE_SECOND_MS, ONE_SECOND_MS), "in 1 minute");
        assert_eq!(human_duration(-ONE_SECOND_MS, ONE_SECOND_MS), "1 second ago");
    }

    #[test]
    fn test_below_unit_is_now() {
        assert_eq!(human_duration(0, ONE_SECOND_MS), "now");
        assert_eq!(human_duration(999, ONE_SECOND_MS), "now");
        assert_eq!(human_duration(-999, ONE_SECOND_MS), "now");
    }

    #[test]
    fn test_millisecond_unit() {
        assert_eq!(human_duration(250, ONE_MILLISECOND_MS), "in 250 milliseconds");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(human_duration(2 * ONE_WEEK_MS, ONE_SECOND_MS), "in 2 weeks");
        assert_eq!(human_duration(-45 * ONE_DAY_MS, ONE_SECOND_MS), "1 month ago");
        assert_eq!(human_duration(800 * ONE_DAY_MS, ONE_SECOND_MS), "in 2 years");
    }

    #[test]
    fn test_unit_floor_respected() {
        // 90 seconds with a one-hour floor reads as "now"
        assert_eq!(human_duration(90 * ONE_SECOND_MS, ONE_HOUR_MS), "now");
        assert_eq!(human_duration(3 * ONE_HOUR_MS, ONE_HOUR_MS), "in 3 hours");
    }

    #[test]
    fn test_total_over_extremes() {
        assert!(human_duration(i64::MIN, ONE_SECOND_MS).ends_with("ago"));
        assert!(human_duration(i64::MAX, ONE_SECOND_MS).starts_with("in "));
        assert_eq!(human_duration(5, 0), "in 5 milliseconds");
        assert_eq!(human_duration(5, -10), "in 5 milliseconds");
    }
}
