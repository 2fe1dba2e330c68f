//! Interchange file exporter.
//!
//! ## Format (bit-exact)
//!
//! - UTF-8 with a leading byte-order mark.
//! - Header row exactly `timestamp,source,type,user,host,short,full`.
//! - One record per line, every field quoted; embedded quotes doubled,
//!   embedded newlines preserved inside quotes.
//! - Timestamps as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
//!
//! Export is all-or-nothing: a mid-stream write failure surfaces as an
//! error and the destination must be treated as invalid by the caller;
//! the kernel makes no rollback attempt.
//!
//! The reader exists so the exact format is verifiable end to end; it
//! is also what downstream tooling tests parse with.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

use crate::types::{format_timestamp, parse_timestamp, CanonicalEvent, Provenance};

/// Exact header row of the interchange file.
pub const INTERCHANGE_HEADER: &str = "timestamp,source,type,user,host,short,full";

/// UTF-8 byte-order mark.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Error raised by interchange serialization.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Destination cannot be written or source cannot be read.
    #[error("interchange I/O error: {0}")]
    Io(#[from] io::Error),
    /// Record-level serialization failure.
    #[error("interchange record error: {0}")]
    Csv(#[from] csv::Error),
    /// Input does not conform to the interchange format.
    #[error("malformed interchange file: {0}")]
    Malformed(String),
}

/// One parsed interchange row.
///
/// Carries every exported field; the sequence id is a session-internal
/// tie-break and is not part of the interchange format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchangeRow {
    /// Parsed `timestamp` column.
    pub timestamp: DateTime<Utc>,
    /// Parsed `source` column.
    pub source: Provenance,
    /// `type` column.
    pub event_kind: String,
    /// `user` column.
    pub user: String,
    /// `host` column.
    pub host: String,
    /// `short` column.
    pub description: String,
    /// `full` column.
    pub details: String,
}

impl InterchangeRow {
    /// The row a given event exports to.
    pub fn from_event(event: &CanonicalEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            source: event.source,
            event_kind: event.event_kind.clone(),
            user: event.user.clone(),
            host: event.host.clone(),
            description: event.description.clone(),
            details: event.details.clone(),
        }
    }
}

/// Write the full ordered event set to `writer` in interchange format.
pub fn write_interchange<W: Write>(events: &[CanonicalEvent], mut writer: W) -> Result<(), ExportError> {
    writer.write_all(&BOM)?;
    writer.write_all(INTERCHANGE_HEADER.as_bytes())?;
    writer.write_all(b"\n")?;

    let mut records = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .has_headers(false)
        .from_writer(writer);

    for event in events {
        records.write_record([
            format_timestamp(&event.timestamp).as_str(),
            event.source.as_str(),
            event.event_kind.as_str(),
            event.user.as_str(),
            event.host.as_str(),
            event.description.as_str(),
            event.details.as_str(),
        ])?;
    }
    records.flush()?;
    Ok(())
}

/// Write the interchange file to a filesystem path.
pub fn write_interchange_to_path(
    events: &[CanonicalEvent],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_interchange(events, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse an interchange file back into rows.
pub fn read_interchange<R: Read>(reader: R) -> Result<Vec<InterchangeRow>, ExportError> {
    let mut reader = BufReader::new(reader);

    let mut bom = [0u8; 3];
    reader
        .read_exact(&mut bom)
        .map_err(|_| ExportError::Malformed("file shorter than a byte-order mark".to_string()))?;
    if bom != BOM {
        return Err(ExportError::Malformed("missing UTF-8 byte-order mark".to_string()));
    }

    let mut records = ReaderBuilder::new().has_headers(true).from_reader(reader);

    {
        let header = records
            .headers()
            .map_err(|e| ExportError::Malformed(format!("unreadable header: {e}")))?;
        let expected: Vec<&str> = INTERCHANGE_HEADER.split(',').collect();
        if header.iter().collect::<Vec<_>>() != expected {
            return Err(ExportError::Malformed(format!(
                "unexpected header row: {header:?}"
            )));
        }
    }

    let mut rows = Vec::new();
    for (index, record) in records.records().enumerate() {
        let record = record?;
        if record.len() != 7 {
            return Err(ExportError::Malformed(format!(
                "row {index}: expected 7 columns, found {}",
                record.len()
            )));
        }
        let timestamp = parse_timestamp(&record[0]).ok_or_else(|| {
            ExportError::Malformed(format!("row {index}: bad timestamp {:?}", &record[0]))
        })?;
        let source = Provenance::from_str(&record[1]).ok_or_else(|| {
            ExportError::Malformed(format!("row {index}: unknown source {:?}", &record[1]))
        })?;
        rows.push(InterchangeRow {
            timestamp,
            source,
            event_kind: record[2].to_string(),
            user: record[3].to_string(),
            host: record[4].to_string(),
            description: record[5].to_string(),
            details: record[6].to_string(),
        });
    }
    Ok(rows)
}
