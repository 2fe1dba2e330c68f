//! Chronological merger.
//!
//! Invoked explicitly, never implicitly on append. Produces a new
//! total order over the full current store content; appending after a
//! merge invalidates the prior order and requires a re-merge.

use crate::store::TimelineStore;
use crate::types::CanonicalEvent;

/// Produce the total chronological order over the store's events.
///
/// Stable sort keyed on (timestamp at millisecond precision,
/// sequence id), O(n log n). Equal-timestamp events therefore keep
/// adapter-registration order, and re-merging an unchanged store is
/// idempotent.
pub fn merge(store: &TimelineStore) -> Vec<CanonicalEvent> {
    let mut ordered: Vec<CanonicalEvent> = store.events().to_vec();
    ordered.sort_by_key(|event| event.merge_key());
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Provenance, SequenceId};
    use chrono::TimeZone;
    use chrono::Utc;

    fn event(millis: i64, seq: u64, source: Provenance) -> CanonicalEvent {
        CanonicalEvent {
            timestamp: Utc.timestamp_millis_opt(millis).unwrap(),
            sequence_id: SequenceId::new(seq),
            source,
            event_kind: "Test".to_string(),
            description: String::new(),
            details: String::new(),
            user: "(unknown)".to_string(),
            host: "(unknown)".to_string(),
        }
    }

    #[test]
    fn test_total_order_by_time_then_sequence() {
        let mut store = TimelineStore::new();
        store.append(event(2_000, 0, Provenance::FileSystemMetadata));
        store.append(event(1_000, 1, Provenance::ChangeJournal));
        store.append(event(1_000, 2, Provenance::AuditLog));
        store.append(event(500, 3, Provenance::RegistryActivity));

        let merged = merge(&store);
        let seqs: Vec<u64> = merged.iter().map(|e| e.sequence_id.value()).collect();
        assert_eq!(seqs, [3, 1, 2, 0]);

        for pair in merged.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.timestamp < b.timestamp
                    || (a.timestamp == b.timestamp && a.sequence_id < b.sequence_id)
            );
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut store = TimelineStore::new();
        for i in 0..50 {
            store.append(event((i * 37) % 200, i as u64, Provenance::AuditLog));
        }
        assert_eq!(merge(&store), merge(&store));
    }

    #[test]
    fn test_merge_does_not_mutate_store() {
        let mut store = TimelineStore::new();
        store.append(event(2_000, 0, Provenance::AuditLog));
        store.append(event(1_000, 1, Provenance::AuditLog));
        let _ = merge(&store);
        assert_eq!(store.events()[0].sequence_id, SequenceId::new(0));
    }

    #[test]
    fn test_append_after_merge_requires_remerge() {
        let mut store = TimelineStore::new();
        store.append(event(2_000, 0, Provenance::AuditLog));
        let first = merge(&store);
        store.append(event(1_000, 1, Provenance::AuditLog));
        let second = merge(&store);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].sequence_id, SequenceId::new(1));
    }

    #[test]
    fn test_empty_store_merges_to_empty() {
        assert!(merge(&TimelineStore::new()).is_empty());
    }
}
