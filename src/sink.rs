//! Dataset sinks
//!
//! Records are appended, never rewritten. Each line written by
//! [`JsonLinesSink`] and [`StdoutSink`] is one complete JSON object.

use crate::error::{Result, SinkError};
use crate::record::ExtractionResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Append-only destination for records
#[async_trait]
pub trait DatasetSink: Send + Sync {
    /// Append one record
    async fn push(&self, record: &ExtractionResult) -> Result<()>;
}

#[async_trait]
impl<T: DatasetSink + ?Sized> DatasetSink for Box<T> {
    async fn push(&self, record: &ExtractionResult) -> Result<()> {
        (**self).push(record).await
    }
}

fn json_line(record: &ExtractionResult) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

fn write_failed(record: &ExtractionResult, e: impl ToString) -> SinkError {
    SinkError::WriteFailed {
        url: record.url.clone(),
        message: e.to_string(),
    }
}

/// Appends records to a JSON-lines file
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed
    #[instrument]
    pub async fn open<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| SinkError::OpenFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Dataset file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSink for JsonLinesSink {
    async fn push(&self, record: &ExtractionResult) -> Result<()> {
        let line = json_line(record)?;
        let mut file = self.file.lock().await;
        file.write_all(&line)
            .await
            .map_err(|e| write_failed(record, e))?;
        file.flush().await.map_err(|e| write_failed(record, e))?;
        debug!(
            path = %self.path.display(),
            url = %record.url,
            "Record appended"
        );
        Ok(())
    }
}

/// Writes records to standard output
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl DatasetSink for StdoutSink {
    async fn push(&self, record: &ExtractionResult) -> Result<()> {
        let line = json_line(record)?;
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(&line)
            .await
            .map_err(|e| write_failed(record, e))?;
        stdout.flush().await.map_err(|e| write_failed(record, e))?;
        Ok(())
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ExtractionResult>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records pushed so far, in order
    pub async fn records(&self) -> Vec<ExtractionResult> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl DatasetSink for MemorySink {
    async fn push(&self, record: &ExtractionResult) -> Result<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionTarget;

    fn record(url: &str) -> ExtractionResult {
        ExtractionResult::failed(url, &[ExtractionTarget::Title], "unreachable")
    }

    #[tokio::test]
    async fn test_json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");

        let sink = JsonLinesSink::open(&path).await.unwrap();
        sink.push(&record("https://a.test")).await.unwrap();
        drop(sink);

        // Reopening must not truncate
        let sink = JsonLinesSink::open(&path).await.unwrap();
        sink.push(&record("https://b.test")).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ExtractionResult = serde_json::from_str(lines[0]).unwrap();
        let second: ExtractionResult = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first.url, "https://a.test");
        assert_eq!(second.url, "https://b.test");
        assert_eq!(second.error.as_deref(), Some("unreachable"));
    }

    #[tokio::test]
    async fn test_json_lines_sink_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dataset.jsonl");
        let err = JsonLinesSink::open(&path).await.err().unwrap();
        assert!(err.to_string().contains("Failed to open dataset"));
    }

    #[tokio::test]
    async fn test_memory_sink_through_box() {
        let sink = MemorySink::new();
        sink.push(&record("https://a.test")).await.unwrap();
        assert_eq!(sink.records().await.len(), 1);

        let boxed: Box<dyn DatasetSink> = Box::new(MemorySink::new());
        boxed.push(&record("https://b.test")).await.unwrap();
    }
}
