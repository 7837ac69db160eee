//! Outbound status events.
//!
//! Every check cycle produces exactly one of these. They exist only as
//! notifications; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Payload shared by the ready and not-ready events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreezeReport {
    pub latitude: f64,
    pub longitude: f64,
    pub longest_freeze_hours: u32,
    pub threshold_f: f64,
    pub required_hours: u32,
    pub checked_at: DateTime<Utc>,
}

/// Classified outcome of one check cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// The freeze window meets or exceeds the required duration.
    Ready(FreezeReport),
    /// A forecast was fetched but the freeze window is too short.
    NotReady(FreezeReport),
    /// The cycle failed; carries a human-readable description.
    Error { error: String },
}

impl StatusEvent {
    /// Event name as seen by the downstream automation layer.
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::Ready(_) => "freeze_ready",
            StatusEvent::NotReady(_) => "freeze_not_ready",
            StatusEvent::Error { .. } => "freeze_error",
        }
    }

    /// Event payload as a JSON mapping.
    pub fn payload(&self) -> Value {
        match self {
            StatusEvent::Ready(report) | StatusEvent::NotReady(report) => json!({
                "latitude": report.latitude,
                "longitude": report.longitude,
                "longest_freeze_hours": report.longest_freeze_hours,
                "threshold_f": report.threshold_f,
                "required_hours": report.required_hours,
                "checked_at": report.checked_at,
            }),
            StatusEvent::Error { error } => json!({ "error": error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_report() -> FreezeReport {
        FreezeReport {
            latitude: 44.9778,
            longitude: -93.2650,
            longest_freeze_hours: 80,
            threshold_f: 25.0,
            required_hours: 72,
            checked_at: Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(StatusEvent::Ready(sample_report()).name(), "freeze_ready");
        assert_eq!(
            StatusEvent::NotReady(sample_report()).name(),
            "freeze_not_ready"
        );
        assert_eq!(
            StatusEvent::Error {
                error: "boom".to_string()
            }
            .name(),
            "freeze_error"
        );
    }

    #[test]
    fn test_report_payload_fields() {
        let payload = StatusEvent::Ready(sample_report()).payload();

        assert_eq!(payload["latitude"], 44.9778);
        assert_eq!(payload["longitude"], -93.2650);
        assert_eq!(payload["longest_freeze_hours"], 80);
        assert_eq!(payload["threshold_f"], 25.0);
        assert_eq!(payload["required_hours"], 72);
        assert!(payload["checked_at"].is_string());
    }

    #[test]
    fn test_ready_and_not_ready_share_payload_shape() {
        let ready = StatusEvent::Ready(sample_report()).payload();
        let not_ready = StatusEvent::NotReady(sample_report()).payload();
        assert_eq!(ready, not_ready);
    }

    #[test]
    fn test_error_payload() {
        let payload = StatusEvent::Error {
            error: "point lookup failed: status 500".to_string(),
        }
        .payload();

        assert_eq!(payload["error"], "point lookup failed: status 500");
        assert!(payload.get("latitude").is_none());
    }
}
