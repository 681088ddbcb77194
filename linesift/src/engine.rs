//! Scan orchestration.
//!
//! [`run_scan`] drives the whole pipeline on the calling thread: validate,
//! pre-count, traverse, scan each file, aggregate, and notify the handler.
//! [`ScanSession`] runs the same loop on a named background thread so the
//! caller's event loop is never blocked, with cooperative cancellation
//! checked before every file.
//!
//! Handler callbacks run on the scanning thread. Implementations that
//! present results elsewhere (a UI event loop, a render tick) are expected
//! to forward from the callback; the engine itself never touches caller
//! state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::results::{ScanProgress, ScanResults};
use crate::scanner::{self, Pattern};
use crate::walk;
use crate::worker::ReadWorker;

/// Callback contract between the engine and a presentation layer
pub trait ScanHandler: Send {
    /// Invoked after every processed file
    fn on_progress(&self, progress: ScanProgress);

    /// Invoked exactly once per scan, after the last file (or after the
    /// in-flight file when the scan was cancelled)
    fn on_complete(&self, results: ScanResults);
}

/// Runs a complete scan on the current thread.
///
/// Per-file failures never abort the scan; the only error returns are the
/// synchronous validation failures (empty pattern, missing root).
pub fn run_scan(
    config: &ScanConfig,
    handler: &dyn ScanHandler,
    cancel: &AtomicBool,
) -> ScanResult<()> {
    let pattern = Pattern::new(config.pattern.clone())?;

    let root = config.effective_root();
    if !root.is_dir() {
        return Err(ScanError::root_not_found(root));
    }

    info!("Starting scan for \"{}\" under {}", pattern, root.display());

    let total = walk::count_files(config);
    debug!("Pre-walk counted {} files", total);

    let mut reader = config
        .isolate_reads
        .then(|| ReadWorker::new(pattern.clone(), config.read_timeout()));

    let mut results = ScanResults::new();
    let mut processed = 0usize;

    for path in walk::walk_files(config) {
        if cancel.load(Ordering::SeqCst) {
            info!("Scan cancelled after {} of {} files", processed, total);
            break;
        }

        let outcome = match reader.as_mut() {
            Some(reader) => reader.scan(&path),
            None => scanner::scan_file(&path, &pattern),
        };
        results.record(outcome);

        processed += 1;
        handler.on_progress(ScanProgress::new(processed, total));
    }

    info!(
        "Scan complete: {} matched, {} failed, {} files visited",
        results.matched.len(),
        results.failed.len(),
        processed
    );

    handler.on_complete(results);
    Ok(())
}

/// A scan running on its own background thread
pub struct ScanSession {
    thread: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

impl ScanSession {
    /// Validates the request and starts the scan thread.
    ///
    /// Validation failures are reported synchronously through the `Err`
    /// return and nothing is started; past this point every notification
    /// flows through the handler.
    pub fn spawn<H>(config: ScanConfig, handler: H) -> ScanResult<ScanSession>
    where
        H: ScanHandler + 'static,
    {
        Pattern::new(config.pattern.clone())?;
        let root = config.effective_root();
        if !root.is_dir() {
            return Err(ScanError::root_not_found(root));
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let thread_cancel = Arc::clone(&cancel);

        let thread = thread::Builder::new()
            .name("linesift-scan".to_string())
            .spawn(move || {
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    if let Err(e) = run_scan(&config, &handler, &thread_cancel) {
                        error!("Scan failed: {}", e);
                    }
                }));
                if outcome.is_err() {
                    error!("Scan thread panicked");
                }
            })?;

        Ok(ScanSession { thread, cancel })
    }

    /// Requests a cooperative stop; the scan ends after the in-flight file.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// True once the scan thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the scan thread to exit
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("Scan thread panicked");
        }
    }
}
