//! Shared types for health snapshots.
//!
//! These types match the JSON emitted by the fleet health endpoint. They are
//! the common data format between the health service and this dashboard: the
//! client deserializes a response body directly into a [`HealthSnapshot`] and
//! never synthesizes partial records.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A complete snapshot of fleet health.
///
/// Maps device ids to their health records. Replaced wholesale on every
/// successful poll; snapshots are never merged field-by-field.
pub type HealthSnapshot = BTreeMap<String, DeviceHealth>;

/// Health record for a single device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceHealth {
    /// The most recent indicator color transition.
    pub last_color: ColorEvent,
    /// The most recent successful upload.
    pub last_upload: UploadEvent,
    /// When the device last blinked (its liveness heartbeat).
    /// The server emits `null` when it cannot resolve a blink.
    #[serde(default)]
    pub last_blink: Option<Timestamp>,
}

/// The most recent color/state transition reported for a device.
///
/// Both fields are nullable: the server emits `{"color": null, "time": null}`
/// when its event lookup fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEvent {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub time: Option<Timestamp>,
}

/// The most recent successful upload for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEvent {
    #[serde(default)]
    pub time: Option<Timestamp>,
}

/// An absolute instant as it appears on the wire.
///
/// The endpoint is loose about timestamp encoding: values arrive either as
/// epoch milliseconds (JSON number) or as an RFC 3339 string. Both parse to
/// the same instant; serialization always produces RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Construct from epoch milliseconds.
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Millis(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Millis(ms) => Timestamp::from_millis(ms).ok_or_else(|| {
                serde::de::Error::custom(format!("epoch millis out of range: {}", ms))
            }),
            Wire::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Timestamp(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "us-east-1-sensor42": {
                "last_color": {
                    "color": "green",
                    "time": "2016-05-01T12:00:00.000Z"
                },
                "last_upload": {
                    "time": 1462104000000
                },
                "last_blink": "2016-05-01T12:04:30+00:00"
            }
        }"#;

        let snapshot: HealthSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 1);

        let device = snapshot.get("us-east-1-sensor42").unwrap();
        assert_eq!(device.last_color.color.as_deref(), Some("green"));
        assert_eq!(
            device.last_color.time,
            Some(Timestamp(Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap())),
        );
        // 1462104000000 ms = 2016-05-01T12:00:00Z
        assert_eq!(device.last_upload.time, device.last_color.time);
        assert_eq!(
            device.last_blink,
            Some(Timestamp(Utc.with_ymd_and_hms(2016, 5, 1, 12, 4, 30).unwrap())),
        );
    }

    #[test]
    fn test_deserialize_null_fields() {
        // The server emits nulls for devices whose event lookups failed.
        let json = r#"{
            "club-radio": {
                "last_color": { "color": null, "time": null },
                "last_upload": { "time": null },
                "last_blink": null
            }
        }"#;

        let snapshot: HealthSnapshot = serde_json::from_str(json).unwrap();
        let device = snapshot.get("club-radio").unwrap();
        assert!(device.last_color.color.is_none());
        assert!(device.last_color.time.is_none());
        assert!(device.last_upload.time.is_none());
        assert!(device.last_blink.is_none());
    }

    #[test]
    fn test_millis_and_rfc3339_parse_to_same_instant() {
        let a: Timestamp = serde_json::from_str("1462104000000").unwrap();
        let b: Timestamp = serde_json::from_str(r#""2016-05-01T12:00:00Z""#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_is_rfc3339() {
        let t = Timestamp(Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap());
        let out = serde_json::to_string(&t).unwrap();
        assert_eq!(out, r#""2016-05-01T12:00:00.000Z""#);
    }
}
