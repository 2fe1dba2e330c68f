//! # timeline-kernel
//!
//! Deterministic correlation of heterogeneous forensic artifacts from a
//! single host into one chronologically ordered timeline.
//!
//! ## Core Contract
//!
//! 1. Stream raw records out of five artifact families (file-system
//!    metadata, change journal, execution traces, audit logs, registry
//!    activity), one adapter at a time
//! 2. Normalize every record into the canonical event model (UTC
//!    milliseconds, resolved-or-verbatim identities, monotonic
//!    sequence ids)
//! 3. Produce a deterministic total order and export it losslessly
//!
//! ## Architecture
//!
//! ```text
//! ArtifactAdapter → normalize → TimelineStore → merge → export
//!        ↑                                        ↓
//!   RecordSource (provider)              Session (ReadyForExport)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - The merge is a stable sort keyed (timestamp, sequence_id); equal
//!   timestamps keep adapter-registration order
//! - Re-merging an unchanged store is idempotent
//! - The interchange file is bit-exact: UTF-8 + BOM, fixed header,
//!   every field quoted, `YYYY-MM-DDTHH:MM:SS.mmmZ` timestamps

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod export;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod session;
pub mod store;
pub mod types;
pub mod worker;

// Re-exports
pub use types::{
    format_timestamp, parse_timestamp, AdapterReport, AdapterState, CanonicalEvent, Provenance,
    RawIdentity, RawOccurrence, RawRecord, RawTimestamp, SequenceId, SessionState,
    UNKNOWN_IDENTITY,
};
pub use adapter::{
    classify_identity, looks_like_sid, ArtifactAdapter, AuditLogAdapter, AuditLogRecord,
    ChangeJournalAdapter, ChangeJournalRecord, ExecutionTraceAdapter, ExecutionTraceRecord,
    FileMetadataAdapter, FileMetadataRecord, RegistryAdapter, RegistryKeyRecord, SourceError,
    DEFAULT_RECORD_CAP,
};
pub use export::{
    read_interchange, write_interchange, write_interchange_to_path, ExportError, InterchangeRow,
    INTERCHANGE_HEADER,
};
pub use merge::merge;
pub use normalize::{normalize, resolve_identity, SequenceCounter};
pub use pipeline::{run_build, BuildPolicy, DEFAULT_DISPLAY_WINDOW, DEFAULT_MAX_RECORDS_PER_SOURCE};
pub use session::{display_text, Session, SessionError};
pub use store::TimelineStore;
pub use worker::{BuildWorker, CancelToken, ProgressSlot, TimelineBuilder, WorkerError};

/// Schema version for the canonical event model.
/// Increment on breaking changes to any serialized type.
pub const TIMELINE_SCHEMA_VERSION: &str = "1.0.0";
