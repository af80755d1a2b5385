//! Opt-in timing and a timestamped debug event log.
//!
//! Timing scopes print to stderr when `--perf` is on and are also written to
//! the debug log when one is open. The debug log is enabled with
//! `--debug-log PATH` or the `MDPAGE_DEBUG_LOG` environment variable.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Environment variable naming a debug log file.
pub const DEBUG_LOG_ENV: &str = "MDPAGE_DEBUG_LOG";

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: LazyLock<Mutex<DebugLog>> = LazyLock::new(|| Mutex::new(DebugLog::new()));

/// Measures the time until it is dropped.
#[derive(Debug)]
#[must_use = "a scope measures until it is dropped"]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let timing = is_enabled();
        let logging = is_debug_log_enabled();
        if !timing && !logging {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if timing {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        if logging {
            log_event("perf.scope", format!("{} took {elapsed_ms:.3} ms", self.name));
        }
    }
}

#[derive(Debug)]
struct DebugLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl DebugLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

// A panic while logging leaves the log usable
fn debug_log() -> MutexGuard<'static, DebugLog> {
    DEBUG_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Open (or with `None`, close) the debug event log.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = debug_log();
    let Some(path) = path else {
        log.writer = None;
        return Ok(());
    };

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "mdpage debug log start")?;
    writer.flush()?;
    log.start = Instant::now();
    log.writer = Some(writer);
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    debug_log().writer.is_some()
}

/// Append `name: detail` to the debug log, stamped with the time since it
/// was opened. Does nothing when no log is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = debug_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {}", detail.as_ref());
        let _ = writer.flush();
    }
}
