//! Human readable durations ("3 days", "About an hour")

use chrono::Duration;

pub fn human_duration(d: Duration) -> String {
    let seconds = d.num_seconds();
    if seconds < 1 {
        return "Less than a second".to_string();
    }
    if seconds == 1 {
        return "1 second".to_string();
    }
    if seconds < 60 {
        return format!("{} seconds", seconds);
    }

    let minutes = d.num_minutes();
    if minutes == 1 {
        return "About a minute".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }

    let hours = d.num_hours();
    if hours == 1 {
        return "About an hour".to_string();
    }
    if hours < 48 {
        return format!("{} hours", hours);
    }
    if hours < 24 * 7 * 2 {
        return format!("{} days", hours / 24);
    }
    if hours < 24 * 30 * 3 {
        return format!("{} weeks", hours / 24 / 7);
    }
    if hours < 24 * 365 * 2 {
        return format!("{} months", hours / 24 / 30);
    }
    format!("{} years", hours / 24 / 365)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let cases = [
            (Duration::milliseconds(300), "Less than a second"),
            (Duration::seconds(1), "1 second"),
            (Duration::seconds(42), "42 seconds"),
            (Duration::seconds(90), "About a minute"),
            (Duration::minutes(17), "17 minutes"),
            (Duration::minutes(61), "About an hour"),
            (Duration::hours(30), "30 hours"),
            (Duration::days(5), "5 days"),
            (Duration::days(21), "3 weeks"),
            (Duration::days(120), "4 months"),
            (Duration::days(365 * 3), "3 years"),
        ];
        for (d, want) in cases {
            assert_eq!(human_duration(d), want);
        }
    }

    #[test]
    fn test_negative_is_less_than_a_second() {
        assert_eq!(human_duration(Duration::seconds(-10)), "Less than a second");
    }
}
