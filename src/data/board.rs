//! Snapshot projection and staleness computation.
//!
//! This module transforms a raw [`HealthSnapshot`] into display-ready rows
//! with staleness computed against configurable thresholds. The projection is
//! pure: given the same snapshot, clock reading, and thresholds, it always
//! produces the same rows.

use chrono::{DateTime, Duration, Utc};

use super::color::{ColorState, UnknownColorError};
use super::relative::{age_exceeds, relative_from};
use crate::source::{DeviceHealth, HealthSnapshot, Timestamp};

/// Staleness policies for the dashboard.
///
/// The two windows are deliberately separate checks: `text_stale` measures
/// the age of an individual event for de-emphasizing its "ago" text, while
/// `blink_stale` measures how long the device has gone without a heartbeat.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Age after which an event's "ago" text is rendered de-emphasized.
    pub text_stale: Duration,
    /// Silence window after which a device is presumed offline.
    pub blink_stale: Duration,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            text_stale: Duration::minutes(5),
            blink_stale: Duration::minutes(1),
        }
    }
}

/// A relative-time phrase plus its own aging flag.
#[derive(Debug, Clone, PartialEq)]
pub struct AgedField {
    /// "5 minutes ago", or "never" when the event is absent.
    pub text: String,
    /// True when the underlying event is older than the text threshold.
    /// An absent event is always stale.
    pub stale: bool,
    /// The underlying instant, kept for sorting; absent events sort first.
    pub at: Option<DateTime<Utc>>,
}

impl AgedField {
    fn project(time: Option<Timestamp>, now: DateTime<Utc>, threshold: Duration) -> Self {
        match time {
            Some(t) => Self {
                text: relative_from(t.0, now),
                stale: age_exceeds(t.0, now, threshold),
                at: Some(t.0),
            },
            None => Self {
                text: "never".to_string(),
                stale: true,
                at: None,
            },
        }
    }
}

/// One device's health, projected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    /// Full device id as keyed by the endpoint.
    pub id: String,
    /// Display name: the id substring after the first hyphen.
    pub name: String,
    /// Indicator state, or the typed error for an unknown/missing color.
    /// An unknown color degrades this row only; neighbors are unaffected.
    pub state: Result<ColorState, UnknownColorError>,
    /// Time since the last color transition.
    pub changed: AgedField,
    /// Time since the last successful upload.
    pub uploaded: AgedField,
    /// Time since the last heartbeat blink.
    pub blinked: AgedField,
    /// True when the device has gone silent past the blink window.
    pub offline: bool,
}

impl DeviceRow {
    /// Project one `(device id, health record)` pair into a display row.
    pub fn project(
        id: &str,
        health: &DeviceHealth,
        now: DateTime<Utc>,
        thresholds: &Thresholds,
    ) -> Self {
        let state = health
            .last_color
            .color
            .as_deref()
            .ok_or_else(|| UnknownColorError("(none)".to_string()))
            .and_then(ColorState::from_wire);

        // Liveness is a signed diff in the blink-to-now direction with its
        // own window, distinct from the text-aging check above.
        let offline = match health.last_blink {
            Some(t) => t.0.signed_duration_since(now) < -thresholds.blink_stale,
            None => true,
        };

        Self {
            id: id.to_string(),
            name: display_name(id).to_string(),
            state,
            changed: AgedField::project(health.last_color.time, now, thresholds.text_stale),
            uploaded: AgedField::project(health.last_upload.time, now, thresholds.text_stale),
            blinked: AgedField::project(health.last_blink, now, thresholds.text_stale),
            offline,
        }
    }

    /// Label for the state column; unknown colors render as "Unknown".
    pub fn state_label(&self) -> &'static str {
        match &self.state {
            Ok(state) => state.label(),
            Err(_) => "Unknown",
        }
    }
}

/// The display name is everything after the first hyphen; ids without a
/// hyphen display as-is.
pub fn display_name(id: &str) -> &str {
    match id.split_once('-') {
        Some((_, rest)) => rest,
        None => id,
    }
}

/// Complete projected dashboard state, ready for rendering.
#[derive(Debug, Clone)]
pub struct BoardData {
    /// One row per device, in sorted id order (stable across renders).
    pub rows: Vec<DeviceRow>,
    /// When the projection was computed, for the status bar.
    pub last_updated: std::time::Instant,
}

impl BoardData {
    /// Project a snapshot into rows.
    ///
    /// Iteration follows the snapshot's sorted keys, so row order is
    /// deterministic for a given snapshot; ordering is display-only.
    pub fn from_snapshot(
        snapshot: &HealthSnapshot,
        now: DateTime<Utc>,
        thresholds: &Thresholds,
    ) -> Self {
        let rows = snapshot
            .iter()
            .map(|(id, health)| DeviceRow::project(id, health, now, thresholds))
            .collect();

        Self {
            rows,
            last_updated: std::time::Instant::now(),
        }
    }

    /// Devices currently in the given state.
    pub fn in_state(&self, state: ColorState) -> usize {
        self.rows.iter().filter(|r| r.state == Ok(state)).count()
    }

    /// Devices whose indicator color could not be mapped.
    pub fn unknown(&self) -> usize {
        self.rows.iter().filter(|r| r.state.is_err()).count()
    }

    /// Devices past the blink window.
    pub fn offline(&self) -> usize {
        self.rows.iter().filter(|r| r.offline).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ColorEvent, UploadEvent};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap()
    }

    fn ts(h: u32, m: u32, s: u32) -> Option<Timestamp> {
        Some(Timestamp(Utc.with_ymd_and_hms(2016, 5, 1, h, m, s).unwrap()))
    }

    fn health(color: Option<&str>, time: Option<Timestamp>, blink: Option<Timestamp>) -> DeviceHealth {
        DeviceHealth {
            last_color: ColorEvent {
                color: color.map(String::from),
                time,
            },
            last_upload: UploadEvent { time },
            last_blink: blink,
        }
    }

    #[test]
    fn test_display_name_splits_on_first_hyphen_only() {
        assert_eq!(display_name("us-east-1-sensor42"), "east-1-sensor42");
        assert_eq!(display_name("club-radio"), "radio");
        assert_eq!(display_name("solo"), "solo");
    }

    #[test]
    fn test_project_green_is_sleeping() {
        let h = health(Some("green"), ts(11, 58, 0), ts(11, 59, 30));
        let row = DeviceRow::project("club-radio", &h, now(), &Thresholds::default());

        assert_eq!(row.name, "radio");
        assert_eq!(row.state, Ok(ColorState::Green));
        assert_eq!(row.state_label(), "Sleeping");
        assert_eq!(row.changed.text, "2 minutes ago");
        assert!(!row.changed.stale);
        assert!(!row.offline);
    }

    #[test]
    fn test_project_unknown_color_degrades_row_only() {
        let h = health(Some("magenta"), ts(11, 58, 0), ts(11, 59, 30));
        let row = DeviceRow::project("club-radio", &h, now(), &Thresholds::default());

        assert_eq!(row.state, Err(UnknownColorError("magenta".to_string())));
        assert_eq!(row.state_label(), "Unknown");
        // The rest of the projection is intact
        assert_eq!(row.changed.text, "2 minutes ago");
    }

    #[test]
    fn test_project_missing_color_is_unknown() {
        let h = health(None, None, ts(11, 59, 30));
        let row = DeviceRow::project("club-radio", &h, now(), &Thresholds::default());
        assert!(row.state.is_err());
        assert_eq!(row.changed.text, "never");
        assert!(row.changed.stale);
    }

    #[test]
    fn test_text_aging_boundary_is_exclusive() {
        let t = Thresholds::default();
        // Exactly 5 minutes old: not stale
        let row = DeviceRow::project("c-r", &health(Some("green"), ts(11, 55, 0), ts(11, 59, 30)), now(), &t);
        assert!(!row.changed.stale);
        // One second past 5 minutes: stale
        let row = DeviceRow::project("c-r", &health(Some("green"), ts(11, 54, 59), ts(11, 59, 30)), now(), &t);
        assert!(row.changed.stale);
    }

    #[test]
    fn test_offline_boundary() {
        let t = Thresholds::default();
        // Blinked exactly one minute ago: still online
        let row = DeviceRow::project("c-r", &health(Some("green"), ts(11, 58, 0), ts(11, 59, 0)), now(), &t);
        assert!(!row.offline);
        // A second past the window: offline
        let row = DeviceRow::project("c-r", &health(Some("green"), ts(11, 58, 0), ts(11, 58, 59)), now(), &t);
        assert!(row.offline);
    }

    #[test]
    fn test_missing_blink_is_offline() {
        let row = DeviceRow::project(
            "c-r",
            &health(Some("green"), ts(11, 58, 0), None),
            now(),
            &Thresholds::default(),
        );
        assert!(row.offline);
        assert_eq!(row.blinked.text, "never");
    }

    #[test]
    fn test_board_rows_follow_sorted_key_order() {
        let mut snapshot = HealthSnapshot::new();
        snapshot.insert("b-two".into(), health(Some("green"), ts(11, 58, 0), ts(11, 59, 30)));
        snapshot.insert("a-one".into(), health(Some("red"), ts(11, 58, 0), ts(11, 59, 30)));

        let board = BoardData::from_snapshot(&snapshot, now(), &Thresholds::default());
        let ids: Vec<&str> = board.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a-one", "b-two"]);
    }

    #[test]
    fn test_board_counts() {
        let mut snapshot = HealthSnapshot::new();
        snapshot.insert("a-one".into(), health(Some("red"), ts(11, 58, 0), ts(11, 59, 30)));
        snapshot.insert("b-two".into(), health(Some("red"), ts(11, 58, 0), None));
        snapshot.insert("c-three".into(), health(Some("teal"), ts(11, 58, 0), ts(11, 59, 30)));

        let board = BoardData::from_snapshot(&snapshot, now(), &Thresholds::default());
        assert_eq!(board.in_state(ColorState::Red), 2);
        assert_eq!(board.unknown(), 1);
        assert_eq!(board.offline(), 1);
    }
}
