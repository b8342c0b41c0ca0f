//! DeadLetterSink - durable capture of terminal failures.
//!
//! Appends line-oriented JSON to an `O_APPEND` file, one FailureRecord per
//! line, flushed per record. A single long-lived writer task consumes from a
//! small internal channel, which keeps file ordering stable and bounds task
//! creation; callers never touch the file on their own path. The in-memory
//! roster mirrors the durable log; the file is authoritative.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use contracts::{DlqConfig, FailureRecord, SinkRole};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Capacity of the writer channel; appends are tiny, so a short buffer is
/// enough to keep the hot path from waiting on disk.
const WRITER_QUEUE: usize = 256;

/// Dead-letter sink.
///
/// Disabled mode turns every operation into a no-op and pins
/// `failed_count` at zero.
pub struct DeadLetterSink {
    inner: Option<DlqInner>,
}

struct DlqInner {
    roster: Mutex<Vec<FailureRecord>>,
    writer_tx: Mutex<Option<mpsc::Sender<FailureRecord>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl DeadLetterSink {
    /// Create the sink and spawn its writer task.
    ///
    /// Missing parent directories are created. When the durable file cannot
    /// be initialized the durable path is disabled - failures still land in
    /// the roster - and the process carries on.
    pub fn spawn(config: &DlqConfig) -> Self {
        if !config.enabled {
            info!("dead-letter sink disabled");
            return Self { inner: None };
        }

        let (writer_tx, writer) = match open_log(&config.file_path) {
            Ok(file) => {
                let (tx, rx) = mpsc::channel(WRITER_QUEUE);
                let path = config.file_path.display().to_string();
                let handle = tokio::spawn(writer_task(file, rx, path));
                (Some(tx), Some(handle))
            }
            Err(e) => {
                error!(
                    path = %config.file_path.display(),
                    error = %e,
                    "failed to initialize dead-letter file; durable capture disabled"
                );
                (None, None)
            }
        };

        if writer.is_some() {
            info!(path = %config.file_path.display(), "dead-letter sink initialized");
        }

        Self {
            inner: Some(DlqInner {
                roster: Mutex::new(Vec::new()),
                writer_tx: Mutex::new(writer_tx),
                writer: Mutex::new(writer),
            }),
        }
    }

    /// A sink with every operation a no-op.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Whether failures are being captured at all.
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Capture one terminal failure.
    ///
    /// The roster is updated immediately; the durable append happens on the
    /// writer task, off the calling path.
    pub async fn record_failure(
        &self,
        record: &str,
        sink: SinkRole,
        attempts: u32,
        reason: impl Into<String>,
    ) {
        let Some(inner) = &self.inner else { return };

        let failure = FailureRecord::new(record, sink, attempts, reason);
        debug!(sink = %sink, attempts, "dead-lettering record");

        inner
            .roster
            .lock()
            .expect("dead-letter roster poisoned")
            .push(failure.clone());

        let tx = inner
            .writer_tx
            .lock()
            .expect("dead-letter writer handle poisoned")
            .clone();
        if let Some(tx) = tx {
            if tx.send(failure).await.is_err() {
                warn!(sink = %sink, "dead-letter writer gone; entry kept in memory only");
            }
        }
    }

    /// Number of failures captured since the last `clear`.
    pub fn failed_count(&self) -> usize {
        match &self.inner {
            Some(inner) => inner
                .roster
                .lock()
                .expect("dead-letter roster poisoned")
                .len(),
            None => 0,
        }
    }

    /// Snapshot of the in-memory roster.
    pub fn failed_records(&self) -> Vec<FailureRecord> {
        match &self.inner {
            Some(inner) => inner
                .roster
                .lock()
                .expect("dead-letter roster poisoned")
                .clone(),
            None => Vec::new(),
        }
    }

    /// Empty the in-memory roster. The durable file is never truncated.
    pub fn clear(&self) {
        if let Some(inner) = &self.inner {
            inner
                .roster
                .lock()
                .expect("dead-letter roster poisoned")
                .clear();
        }
    }

    /// Stop the writer after flushing everything already enqueued.
    pub async fn close(&self) {
        let Some(inner) = &self.inner else { return };

        let tx = inner
            .writer_tx
            .lock()
            .expect("dead-letter writer handle poisoned")
            .take();
        drop(tx);

        let handle = inner
            .writer
            .lock()
            .expect("dead-letter writer handle poisoned")
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = ?e, "dead-letter writer panicked");
            }
        }
    }
}

fn open_log(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Sequential writer: one line per failure, flushed per record so the entry
/// survives normal process termination.
async fn writer_task(
    file: std::fs::File,
    mut rx: mpsc::Receiver<FailureRecord>,
    path: String,
) {
    let mut writer = BufWriter::new(file);
    while let Some(failure) = rx.recv().await {
        let result = writeln!(writer, "{}", failure.to_json_line()).and_then(|()| writer.flush());
        if let Err(e) = result {
            warn!(path = %path, error = %e, "dead-letter append failed");
        }
    }
    debug!(path = %path, "dead-letter writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DlqConfig;
    use std::path::PathBuf;

    fn config_at(path: PathBuf) -> DlqConfig {
        DlqConfig {
            enabled: true,
            file_path: path,
            max_retries: 3,
        }
    }

    #[tokio::test]
    async fn test_record_failure_appends_line_and_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dlq.jsonl");
        let dlq = DeadLetterSink::spawn(&config_at(path.clone()));

        dlq.record_failure("{\"id\":1}", SinkRole::Rest, 3, "Max retries (3) exceeded")
            .await;
        dlq.close().await;

        assert_eq!(dlq.failed_count(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["sink"], "REST");
        assert_eq!(parsed["attempts"], 3);
        assert_eq!(parsed["record"]["id"], 1);
    }

    #[tokio::test]
    async fn test_file_order_matches_capture_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dlq.jsonl");
        let dlq = DeadLetterSink::spawn(&config_at(path.clone()));

        for n in 0..10 {
            dlq.record_failure(&format!("{{\"n\":{n}}}"), SinkRole::Db, 3, "x")
                .await;
        }
        dlq.close().await;

        let content = std::fs::read_to_string(&path).unwrap();
        let ns: Vec<i64> = content
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap()["record"]["n"]
                .as_i64()
                .unwrap())
            .collect();
        assert_eq!(ns, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_parent_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/nested/dlq.jsonl");
        let dlq = DeadLetterSink::spawn(&config_at(path.clone()));

        dlq.record_failure("{}", SinkRole::Mq, 0, "Transformation failed: boom")
            .await;
        dlq.close().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_disabled_sink_is_noop() {
        let dlq = DeadLetterSink::spawn(&DlqConfig {
            enabled: false,
            file_path: PathBuf::from("should/not/appear.jsonl"),
            max_retries: 3,
        });

        dlq.record_failure("{}", SinkRole::Rest, 3, "x").await;
        dlq.close().await;

        assert_eq!(dlq.failed_count(), 0);
        assert!(!PathBuf::from("should/not/appear.jsonl").exists());
    }

    #[tokio::test]
    async fn test_clear_empties_roster_but_not_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dlq.jsonl");
        let dlq = DeadLetterSink::spawn(&config_at(path.clone()));

        dlq.record_failure("{\"id\":1}", SinkRole::Grpc, 3, "x").await;
        dlq.close().await;
        assert_eq!(dlq.failed_count(), 1);

        dlq.clear();
        assert_eq!(dlq.failed_count(), 0);
        assert!(!std::fs::read_to_string(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_failure_keeps_roster_capture() {
        // A directory path cannot be opened as the log file
        let dir = tempfile::tempdir().unwrap();
        let dlq = DeadLetterSink::spawn(&config_at(dir.path().to_path_buf()));

        dlq.record_failure("{}", SinkRole::Rest, 3, "x").await;
        dlq.close().await;

        assert_eq!(dlq.failed_count(), 1);
    }
}
