//! Canonical event types for the timeline kernel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::provenance::Provenance;

/// Sentinel for an identity or host that could not be resolved.
///
/// Written explicitly; the kernel never emits an empty identity field.
pub const UNKNOWN_IDENTITY: &str = "(unknown)";

/// Monotonic sequence number assigned at normalization time.
///
/// Unique within a session and assigned in adapter-registration order,
/// giving the merge a deterministic tie-break for equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Create a sequence id from its raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized, source-agnostic timestamped activity.
///
/// Immutable once appended to a [`TimelineStore`](crate::store::TimelineStore);
/// removal happens only through whole-session reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// UTC instant, millisecond precision.
    pub timestamp: DateTime<Utc>,
    /// Normalization-order sequence number (merge tie-break).
    pub sequence_id: SequenceId,
    /// Artifact family the event originated from.
    pub source: Provenance,
    /// Classification string, e.g. `FileCreated`, `KeyModified`, `Executed`.
    pub event_kind: String,
    /// Short description, full fidelity (no truncation at this layer).
    pub description: String,
    /// Full details, full fidelity.
    pub details: String,
    /// Best-effort user identity; [`UNKNOWN_IDENTITY`] when unresolved.
    pub user: String,
    /// Best-effort host name; [`UNKNOWN_IDENTITY`] when unresolved.
    pub host: String,
}

impl CanonicalEvent {
    /// Merge key: primary timestamp (millisecond precision), secondary
    /// sequence id. Equal-timestamp events keep registration order.
    pub fn merge_key(&self) -> (i64, SequenceId) {
        (self.timestamp.timestamp_millis(), self.sequence_id)
    }

    /// Render the timestamp in the interchange form
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ` (UTC, literal `Z`).
    pub fn format_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Interchange timestamp rendering: `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parse an interchange timestamp back into a UTC instant.
///
/// Accepts exactly the form produced by [`format_timestamp`].
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_event(millis: i64, seq: u64) -> CanonicalEvent {
        CanonicalEvent {
            timestamp: Utc.timestamp_millis_opt(millis).unwrap(),
            sequence_id: SequenceId::new(seq),
            source: Provenance::AuditLog,
            event_kind: "EventID:4624".to_string(),
            description: "logon".to_string(),
            details: "interactive logon".to_string(),
            user: "S-1-5-21-1-2-3-1001".to_string(),
            host: "localhost".to_string(),
        }
    }

    #[test]
    fn test_sequence_id_ordering() {
        assert!(SequenceId::new(1) < SequenceId::new(2));
        assert_eq!(SequenceId::new(7).value(), 7);
    }

    #[test]
    fn test_merge_key_orders_by_time_then_sequence() {
        let a = make_event(1_000, 5);
        let b = make_event(1_000, 6);
        let c = make_event(2_000, 1);
        assert!(a.merge_key() < b.merge_key());
        assert!(b.merge_key() < c.merge_key());
    }

    #[test]
    fn test_timestamp_format_is_millisecond_z() {
        let e = make_event(1_704_103_200_123, 0);
        assert_eq!(e.format_timestamp(), "2024-01-01T10:00:00.123Z");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Utc.timestamp_millis_opt(1_704_103_200_123).unwrap();
        let rendered = format_timestamp(&ts);
        assert_eq!(parse_timestamp(&rendered), Some(ts));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-timestamp"), None);
    }
}
