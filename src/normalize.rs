//! Event normalization.
//!
//! `normalize` is the only place raw records become canonical events.
//! It is total: every syntactically valid [`RawRecord`] yields at least
//! one [`CanonicalEvent`], one per occurrence, each with its own
//! sequence id. Timestamps leave here as UTC instants at millisecond
//! precision; identities leave here as non-empty strings.

use crate::types::{
    CanonicalEvent, Provenance, RawIdentity, RawRecord, SequenceId, UNKNOWN_IDENTITY,
};

/// Well-known security identifiers the kernel resolves to readable
/// names. Anything else stays verbatim.
const WELL_KNOWN_SIDS: &[(&str, &str)] = &[
    ("S-1-1-0", "Everyone"),
    ("S-1-5-18", r"NT AUTHORITY\SYSTEM"),
    ("S-1-5-19", r"NT AUTHORITY\LOCAL SERVICE"),
    ("S-1-5-20", r"NT AUTHORITY\NETWORK SERVICE"),
    ("S-1-5-32-544", r"BUILTIN\Administrators"),
    ("S-1-5-32-545", r"BUILTIN\Users"),
];

/// Monotonic per-session sequence counter.
///
/// Sequence ids are assigned in adapter-registration order, which is
/// what makes the merge tie-break deterministic across runs.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    /// A counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence id.
    pub fn next_id(&mut self) -> SequenceId {
        let id = SequenceId::new(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn assigned(&self) -> u64 {
        self.next
    }
}

/// Normalize one raw record into canonical events.
///
/// One event per occurrence; description and details are carried at
/// full fidelity (display truncation is a presentation concern outside
/// this core).
pub fn normalize(
    record: &RawRecord,
    provenance: Provenance,
    counter: &mut SequenceCounter,
) -> Vec<CanonicalEvent> {
    let user = resolve_identity(&record.identity);
    let host = record
        .host
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string();

    record
        .occurrences
        .iter()
        .map(|occurrence| CanonicalEvent {
            timestamp: occurrence.at.to_utc(),
            sequence_id: counter.next_id(),
            source: provenance,
            event_kind: occurrence.kind.clone(),
            description: record.summary.clone(),
            details: record.detail.clone(),
            user: user.clone(),
            host: host.clone(),
        })
        .collect()
}

/// Best-effort identity resolution.
///
/// Resolved names pass through; well-known security identifiers map to
/// their readable names; any other token is preserved verbatim rather
/// than dropped. The result is never empty.
pub fn resolve_identity(identity: &RawIdentity) -> String {
    match identity {
        RawIdentity::Named(name) if !name.trim().is_empty() => name.clone(),
        RawIdentity::Named(_) => UNKNOWN_IDENTITY.to_string(),
        RawIdentity::Token(token) => {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                return UNKNOWN_IDENTITY.to_string();
            }
            WELL_KNOWN_SIDS
                .iter()
                .find(|(sid, _)| *sid == trimmed)
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| trimmed.to_string())
        }
        RawIdentity::Unknown => UNKNOWN_IDENTITY.to_string(),
    }
}
