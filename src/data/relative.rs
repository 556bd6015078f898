//! Relative time phrases and text-aging checks.

use chrono::{DateTime, Duration, Utc};

/// Describe how long ago `earlier` was, relative to `now`.
///
/// Produces phrases like "just now", "a minute ago", "3 hours ago". Only
/// past timestamps are meaningful; anything not in the past reads "just now".
pub fn relative_from(earlier: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(earlier);
    let secs = elapsed.num_seconds();

    if secs < 10 {
        return "just now".to_string();
    }
    if secs < 60 {
        return format!("{} seconds ago", secs);
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return if minutes == 1 {
            "a minute ago".to_string()
        } else {
            format!("{} minutes ago", minutes)
        };
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return if hours == 1 {
            "an hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        };
    }

    let days = elapsed.num_days();
    if days == 1 {
        "a day ago".to_string()
    } else {
        format!("{} days ago", days)
    }
}

/// Whether `t` is strictly older than `threshold`, measured at `now`.
///
/// The boundary is exclusive: exactly `threshold` old is not yet stale.
pub fn age_exceeds(t: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    now.signed_duration_since(t) > threshold
}
