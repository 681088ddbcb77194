//! Timeout-isolated file reads.
//!
//! A [`ReadWorker`] owns one long-lived reader thread and feeds it one file
//! at a time. Each request carries its own one-shot reply channel; the
//! orchestrator blocks on the reply with a wall-clock deadline. When the
//! deadline passes the reader is abandoned — its job channel is dropped and
//! a fresh thread is spawned lazily for the next file. The stalled thread
//! cannot be forcibly killed; it exits on its own once the blocked read
//! returns and its reply has nowhere to go.
//!
//! This keeps the scan's latency bound (no file can stall it past the
//! budget) without paying a thread spawn per file in the common case: a new
//! thread is only created after a timeout or a reader failure.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::results::FileOutcome;
use crate::scanner::{self, Pattern};

struct ReadJob {
    path: PathBuf,
    reply: Sender<FileOutcome>,
}

/// Scans files on a dedicated reader thread under a fixed deadline
#[derive(Debug)]
pub struct ReadWorker {
    pattern: Pattern,
    timeout: Duration,
    jobs: Option<Sender<ReadJob>>,
}

impl ReadWorker {
    /// Creates a worker for the given pattern and per-file budget.
    ///
    /// The reader thread is spawned on first use.
    pub fn new(pattern: Pattern, timeout: Duration) -> Self {
        Self {
            pattern,
            timeout,
            jobs: None,
        }
    }

    /// Scans one file, bounding the read at the configured deadline.
    ///
    /// Returns [`FileOutcome::TimedOut`] when the deadline passes; the scan
    /// can then move on immediately while the stalled read winds down in
    /// the background.
    pub fn scan(&mut self, path: &Path) -> FileOutcome {
        // One retry: a send can fail if a previously abandoned reader shut
        // down between scans, in which case a fresh thread takes the job.
        for _ in 0..2 {
            let (reply_tx, reply_rx) = mpsc::channel();
            let job = ReadJob {
                path: path.to_path_buf(),
                reply: reply_tx,
            };

            if self.reader().send(job).is_err() {
                self.jobs = None;
                continue;
            }

            return match reply_rx.recv_timeout(self.timeout) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "Read of {} exceeded {:?}; abandoning reader thread",
                        path.display(),
                        self.timeout
                    );
                    self.jobs = None;
                    FileOutcome::TimedOut(path.to_path_buf())
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.jobs = None;
                    FileOutcome::Failed(
                        path.to_path_buf(),
                        "reader thread exited unexpectedly".to_string(),
                    )
                }
            };
        }

        FileOutcome::Failed(
            path.to_path_buf(),
            "reader thread could not be started".to_string(),
        )
    }

    fn reader(&mut self) -> &Sender<ReadJob> {
        if self.jobs.is_none() {
            self.jobs = Some(spawn_reader(self.pattern.clone()));
        }
        match &self.jobs {
            Some(jobs) => jobs,
            None => unreachable!("reader handle was just installed"),
        }
    }
}

fn spawn_reader(pattern: Pattern) -> Sender<ReadJob> {
    let (tx, rx) = mpsc::channel::<ReadJob>();
    let builder = thread::Builder::new().name("linesift-reader".to_string());
    if let Err(e) = builder.spawn(move || run_reader(rx, pattern)) {
        // The dangling sender makes the next send fail, which the caller
        // already handles.
        warn!("Could not spawn reader thread: {}", e);
    }
    tx
}

fn run_reader(jobs: Receiver<ReadJob>, pattern: Pattern) {
    while let Ok(job) = jobs.recv() {
        let outcome = scanner::scan_file(&job.path, &pattern);
        if job.reply.send(outcome).is_err() {
            // The orchestrator gave up on this file; the job channel is
            // gone too, so wind down instead of waiting on recv.
            debug!("Discarding read result delivered after the deadline");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::tempdir;

    fn worker(pattern: &str, timeout: Duration) -> ReadWorker {
        ReadWorker::new(Pattern::new(pattern).unwrap(), timeout)
    }

    #[test]
    fn test_outcomes_pass_through() {
        let dir = tempdir().unwrap();
        let hit = dir.path().join("hit.txt");
        let miss = dir.path().join("miss.txt");
        std::fs::write(&hit, "alpha\nbeta target gamma\n").unwrap();
        std::fs::write(&miss, "alpha\nbeta\n").unwrap();

        let mut worker = worker("target", Duration::from_secs(10));
        assert_eq!(worker.scan(&hit), FileOutcome::Matched(hit.clone()));
        assert_eq!(worker.scan(&miss), FileOutcome::NotMatched);

        let gone = dir.path().join("gone.txt");
        assert!(matches!(worker.scan(&gone), FileOutcome::Failed(_, _)));
    }

    #[test]
    fn test_many_files_reuse_one_reader() {
        let dir = tempdir().unwrap();
        let mut worker = worker("needle", Duration::from_secs(10));

        for i in 0..50 {
            let path = dir.path().join(format!("f{}.txt", i));
            std::fs::write(&path, "needle\n").unwrap();
            assert_eq!(worker.scan(&path), FileOutcome::Matched(path.clone()));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stalled_read_times_out_and_worker_recovers() {
        let dir = tempdir().unwrap();
        let fifo = dir.path().join("stall.fifo");
        // Opening a FIFO for reading blocks until a writer appears, which
        // stands in for a pathological file read.
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let timeout = Duration::from_millis(200);
        let mut worker = worker("x", timeout);

        let started = Instant::now();
        let outcome = worker.scan(&fifo);
        let elapsed = started.elapsed();

        assert_eq!(outcome, FileOutcome::TimedOut(fifo.clone()));
        assert!(elapsed >= timeout);
        assert!(
            elapsed < Duration::from_secs(5),
            "timeout took {:?}",
            elapsed
        );

        // The next file goes to a fresh reader.
        let normal = dir.path().join("ok.txt");
        std::fs::write(&normal, "x marks the spot\n").unwrap();
        assert_eq!(worker.scan(&normal), FileOutcome::Matched(normal.clone()));

        // Unblock the abandoned reader so it can exit.
        let _ = std::fs::OpenOptions::new().write(true).open(&fifo);
    }
}
