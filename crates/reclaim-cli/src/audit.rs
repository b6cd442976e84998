//! NDJSON audit trail.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use reclaim_domain::OutcomeRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialized form of an outcome record, shared by the audit file and
/// `--output json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView<'a> {
    /// `pod` or `job`
    pub resource: &'a str,
    /// Namespace
    pub namespace: &'a str,
    /// Object name
    pub name: &'a str,
    /// Classified state
    pub state: &'a str,
    /// Age in whole seconds
    pub age: u64,
    /// Whether the delete call succeeded
    pub deleted: bool,
    /// Whether this was a dry-run
    pub dry_run: bool,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    /// RFC 3339 timestamp of the outcome
    pub ts: String,
}

impl<'a> From<&'a OutcomeRecord> for RecordView<'a> {
    fn from(record: &'a OutcomeRecord) -> Self {
        Self {
            resource: record.kind.as_str(),
            namespace: &record.namespace,
            name: &record.name,
            state: record.state.as_str(),
            age: record.age.as_secs(),
            deleted: record.deleted,
            dry_run: record.dry_run,
            error: record.error.as_deref(),
            ts: DateTime::<Utc>::from(record.timestamp).to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Writes one JSON line per outcome
pub struct AuditWriter<W: Write> {
    writer: BufWriter<W>,
    lines: usize,
}

impl AuditWriter<File> {
    /// Create (or truncate) the audit file
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> AuditWriter<W> {
    /// Wrap any writer
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            lines: 0,
        }
    }

    /// Append one record
    pub fn write(&mut self, record: &OutcomeRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &RecordView::from(record))?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Flush and return the number of lines written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.lines)
    }
}
