//! Raw provenance records produced by artifact source adapters.
//!
//! A raw record carries timestamps in the artifact's native time base
//! and identity in whatever form the platform handed over. The
//! normalizer ([`crate::normalize`]) converts both into the canonical
//! representation; nothing downstream of it sees native forms.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between 1601-01-01 (FILETIME epoch) and 1970-01-01.
const FILETIME_EPOCH_OFFSET_MILLIS: i64 = 11_644_473_600_000;

/// A timestamp in an artifact's native time base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawTimestamp {
    /// Already a UTC instant.
    Utc(DateTime<Utc>),
    /// Windows FILETIME: 100-nanosecond intervals since 1601-01-01 UTC.
    FileTime(u64),
    /// Seconds since the Unix epoch.
    UnixSeconds(i64),
    /// Milliseconds since the Unix epoch.
    UnixMillis(i64),
    /// Wall-clock local time with an explicit UTC offset.
    ///
    /// The offset is carried on the record so conversion stays pure;
    /// the kernel never consults the environment's time zone.
    LocalTime {
        /// Naive local wall-clock time.
        naive: NaiveDateTime,
        /// Minutes east of UTC at the moment the record was written.
        utc_offset_minutes: i32,
    },
}

impl RawTimestamp {
    /// Convert to a UTC instant at millisecond precision.
    ///
    /// Total: out-of-range inputs clamp to the representable bounds
    /// instead of failing, so a corrupt native timestamp degrades the
    /// event's time rather than dropping the event.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match *self {
            RawTimestamp::Utc(ts) => clamp_millis(ts.timestamp_millis()),
            RawTimestamp::FileTime(ft) => {
                let millis = (ft / 10_000) as i64;
                clamp_millis(millis.saturating_sub(FILETIME_EPOCH_OFFSET_MILLIS))
            }
            RawTimestamp::UnixSeconds(secs) => clamp_millis(secs.saturating_mul(1_000)),
            RawTimestamp::UnixMillis(millis) => clamp_millis(millis),
            RawTimestamp::LocalTime { naive, utc_offset_minutes } => {
                let shifted = naive
                    .checked_sub_signed(Duration::minutes(utc_offset_minutes as i64))
                    .unwrap_or(naive);
                clamp_millis(shifted.and_utc().timestamp_millis())
            }
        }
    }
}

/// Clamp a Unix-millisecond value into the representable UTC range and
/// truncate to millisecond precision.
fn clamp_millis(millis: i64) -> DateTime<Utc> {
    match DateTime::from_timestamp_millis(millis) {
        Some(ts) => ts,
        None if millis < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Identity as delivered by the platform query provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawIdentity {
    /// Already a human-readable account name.
    Named(String),
    /// An unresolved identity token, e.g. a raw security identifier
    /// string. Preserved verbatim when resolution fails.
    Token(String),
    /// The artifact carries no identity at all.
    Unknown,
}

/// One timestamped activity inside a raw record.
///
/// Most records carry exactly one occurrence; a file-metadata record
/// carries one per recorded time (created, modified), which the
/// normalizer expands into separate canonical events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOccurrence {
    /// Classification string for the resulting event, e.g. `FileCreated`.
    pub kind: String,
    /// When the activity happened, in the artifact's native time base.
    pub at: RawTimestamp,
}

/// A decoded record from one artifact source, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Timestamped activities; never empty for a syntactically valid record.
    pub occurrences: Vec<RawOccurrence>,
    /// Identity associated with the activity.
    pub identity: RawIdentity,
    /// Host name, when the artifact records one.
    pub host: Option<String>,
    /// Short description.
    pub summary: String,
    /// Full detail text.
    pub detail: String,
}

impl RawRecord {
    /// Single-occurrence convenience constructor.
    pub fn single(
        kind: impl Into<String>,
        at: RawTimestamp,
        identity: RawIdentity,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            occurrences: vec![RawOccurrence { kind: kind.into(), at }],
            identity,
            host: None,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Attach a host name.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_filetime_conversion() {
        // 2024-01-01T00:00:00Z as FILETIME.
        let unix_millis: i64 = 1_704_067_200_000;
        let ft = ((unix_millis + FILETIME_EPOCH_OFFSET_MILLIS) * 10_000) as u64;
        let ts = RawTimestamp::FileTime(ft).to_utc();
        assert_eq!(ts, Utc.timestamp_millis_opt(unix_millis).unwrap());
    }

    #[test]
    fn test_filetime_extreme_value_does_not_panic() {
        // Far-future FILETIME converts without panicking.
        let ts = RawTimestamp::FileTime(u64::MAX).to_utc();
        assert!(ts > Utc.timestamp_millis_opt(0).unwrap());
    }

    #[test]
    fn test_unix_seconds_and_millis_agree() {
        let a = RawTimestamp::UnixSeconds(1_704_067_200).to_utc();
        let b = RawTimestamp::UnixMillis(1_704_067_200_000).to_utc();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unix_millis_out_of_range_clamps() {
        assert_eq!(RawTimestamp::UnixMillis(i64::MAX).to_utc(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(RawTimestamp::UnixMillis(i64::MIN).to_utc(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_local_time_offset_applied() {
        // 10:00 at UTC+2 is 08:00 UTC.
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let ts = RawTimestamp::LocalTime { naive, utc_offset_minutes: 120 }.to_utc();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_local_time_negative_offset() {
        // 10:00 at UTC-5 is 15:00 UTC.
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let ts = RawTimestamp::LocalTime { naive, utc_offset_minutes: -300 }.to_utc();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_utc_input_truncates_to_millis() {
        let ts = Utc.timestamp_opt(1_704_067_200, 123_456_789).unwrap();
        let truncated = RawTimestamp::Utc(ts).to_utc();
        assert_eq!(truncated.timestamp_millis(), 1_704_067_200_123);
        assert_eq!(truncated.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_single_record_builder() {
        let rec = RawRecord::single(
            "Executed",
            RawTimestamp::UnixSeconds(1_000),
            RawIdentity::Unknown,
            "app.exe",
            "Application executed: app.exe",
        )
        .with_host("WKS-01");
        assert_eq!(rec.occurrences.len(), 1);
        assert_eq!(rec.host.as_deref(), Some("WKS-01"));
    }
}
