//! Artifact provenance for the timeline kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of artifact families an event can originate from.
///
/// The `Display` form is the exact string written to the `source`
/// column of the interchange file, so changing it is a format break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// File-system metadata table (creation/modification records).
    FileSystemMetadata,
    /// File-system change journal entries.
    ChangeJournal,
    /// Execution-trace cache (program run evidence).
    ExecutionTrace,
    /// Platform audit log channels.
    AuditLog,
    /// Registry key activity (last-write times).
    RegistryActivity,
}

impl Provenance {
    /// All artifact families, in canonical registration order.
    pub const ALL: [Provenance; 5] = [
        Provenance::FileSystemMetadata,
        Provenance::ChangeJournal,
        Provenance::ExecutionTrace,
        Provenance::AuditLog,
        Provenance::RegistryActivity,
    ];

    /// Parse a provenance from its interchange string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FileSystemMetadata" => Some(Self::FileSystemMetadata),
            "ChangeJournal" => Some(Self::ChangeJournal),
            "ExecutionTrace" => Some(Self::ExecutionTrace),
            "AuditLog" => Some(Self::AuditLog),
            "RegistryActivity" => Some(Self::RegistryActivity),
            _ => None,
        }
    }

    /// Interchange string for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileSystemMetadata => "FileSystemMetadata",
            Self::ChangeJournal => "ChangeJournal",
            Self::ExecutionTrace => "ExecutionTrace",
            Self::AuditLog => "AuditLog",
            Self::RegistryActivity => "RegistryActivity",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
