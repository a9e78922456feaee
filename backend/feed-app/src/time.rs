//! Relative timestamps ("5 minutes ago")
//!
//! Same thresholds and rounding as dayjs' `fromNow`, so the strings match
//! what the web client shows.

use chrono::{DateTime, Utc};

const DAYS_PER_MONTH: f64 = 30.436875;

/// Format `then` relative to `now`
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta_ms = (now - then).num_milliseconds();
    let phrase = phrase(delta_ms.unsigned_abs() as f64 / 1000.0);

    if delta_ms < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn phrase(secs: f64) -> String {
    if secs.round() <= 44.0 {
        return "a few seconds".to_string();
    }
    if secs.round() <= 89.0 {
        return "a minute".to_string();
    }

    let minutes = (secs / 60.0).round();
    if minutes <= 44.0 {
        return counted(minutes, "minute", "a minute");
    }
    if minutes <= 89.0 {
        return "an hour".to_string();
    }

    let hours = (secs / 3_600.0).round();
    if hours <= 21.0 {
        return counted(hours, "hour", "an hour");
    }
    if hours <= 35.0 {
        return "a day".to_string();
    }

    let days_exact = secs / 86_400.0;
    let days = days_exact.round();
    if days <= 25.0 {
        return counted(days, "day", "a day");
    }
    if days <= 45.0 {
        return "a month".to_string();
    }

    let months_exact = days_exact / DAYS_PER_MONTH;
    let months = months_exact.round();
    if months <= 10.0 {
        return counted(months, "month", "a month");
    }
    if months <= 17.0 {
        return "a year".to_string();
    }

    counted((months_exact / 12.0).round(), "year", "a year")
}

fn counted(n: f64, unit: &str, single: &str) -> String {
    if n <= 1.0 {
        single.to_string()
    } else {
        format!("{} {}s", n as u64, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(delta: Duration) -> String {
        let now = Utc::now();
        from_now(now - delta, now)
    }

    #[test]
    fn test_seconds_and_minutes() {
        assert_eq!(ago(Duration::seconds(0)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(44)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(45)), "a minute ago");
        assert_eq!(ago(Duration::seconds(89)), "a minute ago");
        assert_eq!(ago(Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
    }

    #[test]
    fn test_hours_and_days() {
        assert_eq!(ago(Duration::minutes(45)), "an hour ago");
        assert_eq!(ago(Duration::minutes(90)), "2 hours ago");
        assert_eq!(ago(Duration::hours(21)), "21 hours ago");
        assert_eq!(ago(Duration::hours(22)), "a day ago");
        assert_eq!(ago(Duration::hours(36)), "2 days ago");
        assert_eq!(ago(Duration::days(25)), "25 days ago");
    }

    #[test]
    fn test_months_and_years() {
        assert_eq!(ago(Duration::days(26)), "a month ago");
        assert_eq!(ago(Duration::days(45)), "a month ago");
        assert_eq!(ago(Duration::days(46)), "2 months ago");
        assert_eq!(ago(Duration::days(300)), "10 months ago");
        assert_eq!(ago(Duration::days(365)), "a year ago");
        assert_eq!(ago(Duration::days(365 * 2)), "2 years ago");
    }

    #[test]
    fn test_future_instants() {
        let now = Utc::now();
        assert_eq!(from_now(now + Duration::minutes(5), now), "in 5 minutes");
        assert_eq!(from_now(now + Duration::seconds(10), now), "in a few seconds");
    }
}
