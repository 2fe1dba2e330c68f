//! File-system metadata adapter.
//!
//! Decodes file-metadata table records (creation and modification
//! times per file). One provider record expands into a created and a
//! modified occurrence; the normalizer turns those into separate
//! canonical events.

use serde::{Deserialize, Serialize};

use crate::types::{Provenance, RawIdentity, RawOccurrence, RawRecord, RawTimestamp};

use super::{ArtifactAdapter, SourceError, DEFAULT_RECORD_CAP};

/// One file entry from the metadata table provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadataRecord {
    /// Full path of the file.
    pub path: String,
    /// Owning identity, as the platform reports it.
    pub owner: RawIdentity,
    /// Creation time in the artifact's native time base.
    pub created: RawTimestamp,
    /// Last modification time.
    pub modified: RawTimestamp,
    /// File size when recorded.
    pub size: Option<u64>,
}

/// Adapter over a file-metadata query provider.
pub struct FileMetadataAdapter<I> {
    records: I,
    cap: usize,
}

impl<I> FileMetadataAdapter<I> {
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

impl<I> ArtifactAdapter for FileMetadataAdapter<I>
where
    I: Iterator<Item = Result<FileMetadataRecord, SourceError>> + Send,
{
    fn provenance(&self) -> Provenance {
        Provenance::FileSystemMetadata
    }

    fn label(&self) -> &str {
        "file-system metadata"
    }

    fn record_cap(&self) -> usize {
        self.cap
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError> {
        let Some(entry) = self.records.next() else {
            return Ok(None);
        };
        let entry = entry?;

        let detail = match entry.size {
            Some(size) => format!("File: {} ({size} bytes)", entry.path),
            None => format!("File: {}", entry.path),
        };

        Ok(Some(RawRecord {
            occurrences: vec![
                RawOccurrence { kind: "FileCreated".to_string(), at: entry.created },
                RawOccurrence { kind: "FileModified".to_string(), at: entry.modified },
            ],
            identity: entry.owner,
            host: None,
            summary: entry.path,
            detail,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileMetadataRecord {
        FileMetadataRecord {
            path: r"C:\Windows\System32\cmd.exe".to_string(),
            owner: RawIdentity::Named("TrustedInstaller".to_string()),
            created: RawTimestamp::UnixSeconds(1_700_000_000),
            modified: RawTimestamp::UnixSeconds(1_700_000_100),
            size: Some(289_792),
        }
    }

    #[test]
    fn test_expands_to_created_and_modified() {
        let mut adapter = FileMetadataAdapter::new(vec![Ok(sample())].into_iter());
        let record = adapter.next_record().unwrap().unwrap();
        let kinds: Vec<&str> = record.occurrences.iter().map(|o| o.kind.as_str()).collect();
        assert_eq!(kinds, ["FileCreated", "FileModified"]);
        assert!(record.detail.contains("289792 bytes"));
        assert!(adapter.next_record().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_passes_through() {
        let items = vec![
            Err(SourceError::CorruptRecord("bad attribute list".to_string())),
            Ok(sample()),
        ];
        let mut adapter = FileMetadataAdapter::new(items.into_iter());
        assert!(matches!(
            adapter.next_record(),
            Err(SourceError::CorruptRecord(_))
        ));
        assert!(adapter.next_record().unwrap().is_some());
    }
}
