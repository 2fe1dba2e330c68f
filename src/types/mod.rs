//! Core types for the timeline kernel.

pub mod event;
pub mod provenance;
pub mod record;
pub mod status;

pub use event::{format_timestamp, parse_timestamp, CanonicalEvent, SequenceId, UNKNOWN_IDENTITY};
pub use provenance::Provenance;
pub use record::{RawIdentity, RawOccurrence, RawRecord, RawTimestamp};
pub use status::{AdapterReport, AdapterState, SessionState};
