//! Registry activity adapter.
//!
//! Decodes registry key last-write records. Key paths are normalized
//! (hive abbreviations expanded, repeated separators collapsed) so the
//! same key always yields the same event text regardless of which
//! query surface produced it.

use serde::{Deserialize, Serialize};

use crate::types::{Provenance, RawIdentity, RawRecord, RawTimestamp};

use super::{ArtifactAdapter, SourceError, DEFAULT_RECORD_CAP};

/// One registry key record from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryKeyRecord {
    /// Full key path, possibly with an abbreviated hive prefix.
    pub key_path: String,
    /// Key last-write time.
    pub last_write: RawTimestamp,
    /// Number of values under the key, when the provider reports it.
    pub value_count: Option<u32>,
}

/// Adapter over a registry query provider.
pub struct RegistryAdapter<I> {
    records: I,
    cap: usize,
}

impl<I> RegistryAdapter<I> {
    /// Wrap a provider iterator with the default record cap.
    pub fn new(records: I) -> Self {
        Self { records, cap: DEFAULT_RECORD_CAP }
    }

    /// Override the record cap.
    pub fn with_record_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

impl<I> ArtifactAdapter for RegistryAdapter<I>
where
    I: Iterator<Item = Result<RegistryKeyRecord, SourceError>> + Send,
{
    fn provenance(&self) -> Provenance {
        Provenance::RegistryActivity
    }

    fn label(&self) -> &str {
        "registry keys"
    }

    fn record_cap(&self) -> usize {
        self.cap
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError> {
        let Some(entry) = self.records.next() else {
            return Ok(None);
        };
        let entry = entry?;

        if entry.key_path.trim().is_empty() {
            return Err(SourceError::CorruptRecord("registry record has no key path".to_string()));
        }

        let key = normalize_key_path(&entry.key_path);
        let detail = match entry.value_count {
            Some(n) => format!("Registry key last modified: {key} ({n} values)"),
            None => format!("Registry key last modified: {key}"),
        };

        Ok(Some(RawRecord::single(
            "KeyModified",
            entry.last_write,
            RawIdentity::Named("(system)".to_string()),
            key,
            detail,
        )))
    }
}

/// Expand hive abbreviations and collapse repeated path separators.
fn normalize_key_path(path: &str) -> String {
    let collapse = regex_lite::Regex::new(r"\\{2,}").unwrap();
    let collapsed = collapse.replace_all(path.trim(), r"\").to_string();

    for (abbrev, full) in [
        ("HKLM", "HKEY_LOCAL_MACHINE"),
        ("HKCU", "HKEY_CURRENT_USER"),
        ("HKCR", "HKEY_CLASSES_ROOT"),
        ("HKU", "HKEY_USERS"),
    ] {
        if let Some(rest) = collapsed.strip_prefix(abbrev) {
            if rest.is_empty() || rest.starts_with('\\') {
                return format!("{full}{rest}");
            }
        }
    }
    collapsed
}
