//! Build pipeline: the orchestration state machine.
//!
//! One linear pass: adapters run strictly sequentially (never
//! concurrently), each terminal status is recorded before the next
//! adapter starts, and the merge always runs over whatever was
//! collected. Record-level and adapter-level failures are recovered
//! here and surface only as status metadata; nothing in ingestion or
//! merge aborts the build.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::{ArtifactAdapter, SourceError};
use crate::merge::merge;
use crate::normalize::{normalize, SequenceCounter};
use crate::session::Session;
use crate::types::{AdapterReport, AdapterState, SessionState};
use crate::worker::{CancelToken, ProgressSlot};

/// Rows exposed to display readers by default.
pub const DEFAULT_DISPLAY_WINDOW: usize = 5_000;

/// Ceiling applied on top of every adapter's own record cap.
pub const DEFAULT_MAX_RECORDS_PER_SOURCE: usize = 1_000;

/// Build-wide resource policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPolicy {
    /// Hard per-source record ceiling; the effective cap for an
    /// adapter is the smaller of this and the adapter's own cap.
    pub max_records_per_source: usize,
    /// Maximum rows handed to display readers.
    pub display_window: usize,
}

impl Default for BuildPolicy {
    fn default() -> Self {
        Self {
            max_records_per_source: DEFAULT_MAX_RECORDS_PER_SOURCE,
            display_window: DEFAULT_DISPLAY_WINDOW,
        }
    }
}

/// Run the full pipeline over the given adapters.
///
/// Always returns a session in `ReadyForExport`; cancellation and
/// per-adapter failures show up in the session's reports, not as
/// errors. Cancellation is honored between records only, never
/// mid-record, and skips adapters that have not started.
pub fn run_build(
    mut adapters: Vec<Box<dyn ArtifactAdapter>>,
    policy: BuildPolicy,
    cancel: &CancelToken,
    progress: &ProgressSlot,
) -> Session {
    let mut session = Session::new(policy);
    session.state = SessionState::Running;
    session.reports = adapters
        .iter()
        .map(|a| AdapterReport::pending(a.provenance(), a.label()))
        .collect();

    info!(session_id = %session.session_id(), adapters = adapters.len(), "timeline build started");

    let mut counter = SequenceCounter::new();
    for (index, adapter) in adapters.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            session.reports[index].state = AdapterState::Failed {
                reason: "not started: build cancelled".to_string(),
                cancelled: true,
            };
            continue;
        }
        progress.publish(format!("Parsing {}...", adapter.label()));
        run_adapter(adapter.as_mut(), &mut session, index, &mut counter, cancel);

        let report = &session.reports[index];
        info!(
            source = %report.provenance,
            state = %report.state,
            records = report.records_read,
            skipped = report.records_skipped,
            events = report.events_emitted,
            "adapter finished"
        );
        progress.publish(format!(
            "{}: {} ({} record(s))",
            report.label, report.state, report.records_read
        ));
    }

    progress.publish("Sorting events chronologically...".to_string());
    session.merged = merge(&session.store);
    session.state = SessionState::Merged;
    info!(
        session_id = %session.session_id(),
        events = session.merged.len(),
        partial = session.is_partial(),
        "merge complete"
    );

    session.state = SessionState::ReadyForExport;
    progress.publish(session.summary());
    session
}

/// Drive one adapter to a terminal state.
fn run_adapter(
    adapter: &mut dyn ArtifactAdapter,
    session: &mut Session,
    index: usize,
    counter: &mut SequenceCounter,
    cancel: &CancelToken,
) {
    let provenance = adapter.provenance();
    let cap = adapter
        .record_cap()
        .min(session.policy.max_records_per_source);
    session.reports[index].state = AdapterState::InProgress;

    let terminal = loop {
        if cancel.is_cancelled() {
            break AdapterState::Failed {
                reason: "cancellation requested".to_string(),
                cancelled: true,
            };
        }
        if session.reports[index].records_read as usize >= cap {
            warn!(source = %provenance, cap, "record cap reached, result is partial");
            break AdapterState::Truncated;
        }
        match adapter.next_record() {
            Ok(Some(record)) => {
                session.reports[index].records_read += 1;
                let events = normalize(&record, provenance, counter);
                session.reports[index].events_emitted += events.len() as u64;
                session.store.extend(events);
            }
            Ok(None) => break AdapterState::Done,
            Err(SourceError::CorruptRecord(reason)) => {
                session.reports[index].records_skipped += 1;
                warn!(source = %provenance, %reason, "skipping corrupt record");
            }
            Err(SourceError::Unavailable(reason)) => {
                warn!(source = %provenance, %reason, "source unavailable, recording partial result");
                break AdapterState::Failed { reason, cancelled: false };
            }
        }
    };
    session.reports[index].state = terminal;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::registry::{RegistryAdapter, RegistryKeyRecord};
    use crate::types::RawTimestamp;

    fn key_record(n: u32) -> Result<RegistryKeyRecord, SourceError> {
        Ok(RegistryKeyRecord {
            key_path: format!(r"HKLM\SOFTWARE\Key{n}"),
            last_write: RawTimestamp::UnixSeconds(1_700_000_000 + n as i64),
            value_count: None,
        })
    }

    #[test]
    fn test_policy_defaults() {
        let policy = BuildPolicy::default();
        assert_eq!(policy.display_window, DEFAULT_DISPLAY_WINDOW);
        assert_eq!(policy.max_records_per_source, DEFAULT_MAX_RECORDS_PER_SOURCE);
    }

    #[test]
    fn test_policy_serde_round_trip() {
        let policy = BuildPolicy { max_records_per_source: 50, display_window: 10 };
        let json = serde_json::to_string(&policy).unwrap();
        let back: BuildPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_records_per_source, 50);
        assert_eq!(back.display_window, 10);
    }

    #[test]
    fn test_policy_ceiling_overrides_adapter_cap() {
        let records: Vec<_> = (0..20).map(key_record).collect();
        let adapters: Vec<Box<dyn ArtifactAdapter>> =
            vec![Box::new(RegistryAdapter::new(records.into_iter()))];
        let policy = BuildPolicy { max_records_per_source: 5, ..BuildPolicy::default() };

        let session = run_build(adapters, policy, &CancelToken::new(), &ProgressSlot::new());
        assert_eq!(session.reports()[0].records_read, 5);
        assert!(session.reports()[0].state.is_truncated());
    }
}
