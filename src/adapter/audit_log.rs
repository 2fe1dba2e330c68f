//! Audit-log adapter.
//!
//! Decodes platform audit-log entries from one channel per adapter
//! instance (register one adapter per channel). The numeric event
//! identifier becomes the kind (`EventID:<n>`) and the recording
//! identity string is classified into a name or an unresolved token.

use serde::{Deserialize, Serialize};

use crate::types::{Provenance, RawRecord, RawTimestamp};

use super::{classify_identity, ArtifactAdapter, SourceError};

/// Default cap per audit-log channel.
pub const AUDIT_LOG_RECORD_CAP: usize = 1_000;

/// One audit-log entry from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogRecord {
    /// Numeric event identifier.
    pub event_id: u32,
    /// Name of the provider that wrote the entry.
    pub provider: String,
    /// When the entry was created.
    pub created: RawTimestamp,
    /// Recording identity string (account name or raw security
    /// identifier); empty when the entry carries none.
    pub user: String,
    /// Rendered message text, when available.
    pub message: Option<String>,
}

/// Adapter over an audit-log query provider for one channel.
pub struct AuditLogAdapter<I> {
    records: I,
    label: String,
    cap: usize,
}

impl<I> AuditLogAdapter<I> {
    /// Wrap a provider iterator for the named channel.
    pub fn new(channel: impl Into<String>, records: I) -> Self {
        Self {
            records,
            label: format!("audit log ({})", channel.into()),
            cap: AUDIT_LOG_RECORD_CAP,
        }
    }

    /// Override the record cap.
    pub fn with_record_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

impl<I> ArtifactAdapter for AuditLogAdapter<I>
where
    I: Iterator<Item = Result<AuditLogRecord, SourceError>> + Send,
{
    fn provenance(&self) -> Provenance {
        Provenance::AuditLog
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn record_cap(&self) -> usize {
        self.cap
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError> {
        let Some(entry) = self.records.next() else {
            return Ok(None);
        };
        let entry = entry?;

        let detail = entry
            .message
            .unwrap_or_else(|| format!("{} event {}", entry.provider, entry.event_id));

        Ok(Some(RawRecord::single(
            format!("EventID:{}", entry.event_id),
            entry.created,
            classify_identity(&entry.user),
            entry.provider,
            detail,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawIdentity;

    fn logon_entry(user: &str) -> AuditLogRecord {
        AuditLogRecord {
            event_id: 4624,
            provider: "Microsoft-Windows-Security-Auditing".to_string(),
            created: RawTimestamp::UnixMillis(1_704_103_200_000),
            user: user.to_string(),
            message: Some("An account was successfully logged on.".to_string()),
        }
    }

    #[test]
    fn test_event_id_becomes_kind() {
        let mut adapter = AuditLogAdapter::new("Security", vec![Ok(logon_entry("alice"))].into_iter());
        let record = adapter.next_record().unwrap().unwrap();
        assert_eq!(record.occurrences[0].kind, "EventID:4624");
        assert_eq!(record.identity, RawIdentity::Named("alice".to_string()));
        assert_eq!(adapter.label(), "audit log (Security)");
    }

    #[test]
    fn test_sid_user_stays_a_token() {
        let sid = "S-1-5-21-3623811015-3361044348-30300820-1013";
        let mut adapter = AuditLogAdapter::new("Security", vec![Ok(logon_entry(sid))].into_iter());
        let record = adapter.next_record().unwrap().unwrap();
        assert_eq!(record.identity, RawIdentity::Token(sid.to_string()));
    }

    #[test]
    fn test_missing_message_falls_back_to_provider() {
        let mut entry = logon_entry("");
        entry.message = None;
        let mut adapter = AuditLogAdapter::new("System", vec![Ok(entry)].into_iter());
        let record = adapter.next_record().unwrap().unwrap();
        assert!(record.detail.contains("event 4624"));
        assert_eq!(record.identity, RawIdentity::Unknown);
    }
}
