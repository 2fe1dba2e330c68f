//! Execution-trace adapter.
//!
//! Decodes execution-trace cache entries (program run evidence). Each
//! entry yields one `Executed` event at the recorded last-run time.

use serde::{Deserialize, Serialize};

use crate::types::{Provenance, RawIdentity, RawRecord, RawTimestamp};

use super::{ArtifactAdapter, SourceError};

/// Default cap for execution traces; the cache is small by design.
pub const EXECUTION_TRACE_RECORD_CAP: usize = 100;

/// One execution-trace entry from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionTraceRecord {
    /// Executable name as recorded in the trace.
    pub executable: String,
    /// Most recent recorded run.
    pub last_run: RawTimestamp,
    /// Recorded run count, when the format carries one.
    pub run_count: Option<u32>,
}

/// Adapter over an execution-trace query provider.
pub struct ExecutionTraceAdapter<I> {
    records: I,
    cap: usize,
}

impl<I> ExecutionTraceAdapter<I> {
    /// Wrap a provider iterator with the family default cap.
    pub fn new(records: I) -> Self {
        Self { records, cap: EXECUTION_TRACE_RECORD_CAP }
    }

    /// Override the record cap.
    pub fn with_record_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

impl<I> ArtifactAdapter for ExecutionTraceAdapter<I>
where
    I: Iterator<Item = Result<ExecutionTraceRecord, SourceError>> + Send,
{
    fn provenance(&self) -> Provenance {
        Provenance::ExecutionTrace
    }

    fn label(&self) -> &str {
        "execution traces"
    }

    fn record_cap(&self) -> usize {
        self.cap
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, SourceError> {
        let Some(entry) = self.records.next() else {
            return Ok(None);
        };
        let entry = entry?;

        let detail = match entry.run_count {
            Some(count) => format!("Application executed: {} (run count {count})", entry.executable),
            None => format!("Application executed: {}", entry.executable),
        };

        Ok(Some(RawRecord::single(
            "Executed",
            entry.last_run,
            RawIdentity::Unknown,
            entry.executable,
            detail,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executed_event_shape() {
        let entry = ExecutionTraceRecord {
            executable: "NOTEPAD.EXE".to_string(),
            last_run: RawTimestamp::FileTime(133_493_664_000_000_000),
            run_count: Some(12),
        };
        let mut adapter = ExecutionTraceAdapter::new(vec![Ok(entry)].into_iter());
        let record = adapter.next_record().unwrap().unwrap();
        assert_eq!(record.occurrences[0].kind, "Executed");
        assert_eq!(record.summary, "NOTEPAD.EXE");
        assert!(record.detail.contains("run count 12"));
    }

    #[test]
    fn test_family_default_cap() {
        let adapter =
            ExecutionTraceAdapter::new(std::iter::empty::<Result<ExecutionTraceRecord, SourceError>>());
        assert_eq!(adapter.record_cap(), EXECUTION_TRACE_RECORD_CAP);
    }
}
