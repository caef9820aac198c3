//! In-memory log sink for the driver
//!
//! Pre-boot there is no console we can rely on from a driver, so records are
//! kept in a bounded buffer the host (or a test) can read back. Call sites use
//! the regular `log` macros.

use crate::config::LogLevel;
use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use log::{Log, Metadata, Record};
use spin::Mutex;

const MAX_LOG_ENTRIES: usize = 64;

static LOGGER: BufferLogger = BufferLogger::new();
static LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

struct BufferLogger {
    entries: Mutex<VecDeque<String>>,
}

impl BufferLogger {
    const fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }
}

impl Log for BufferLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        let mut entries = self.entries.lock();
        if entries.len() == MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(line);
        LOG_COUNT.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}
}

/// Install the buffer as the global logger
///
/// Safe to call more than once; later calls only change the level.
pub fn init(level: LogLevel) {
    // Err means a logger is already installed (ours or the host's)
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level.to_level_filter());
}

/// Snapshot of the retained entries, oldest first
pub fn entries() -> Vec<String> {
    LOGGER.entries.lock().iter().cloned().collect()
}

/// Total number of records accepted, including ones already evicted
pub fn count() -> usize {
    LOG_COUNT.load(Ordering::SeqCst)
}

/// Whether any retained entry contains `needle`
pub fn contains(needle: &str) -> bool {
    LOGGER.entries.lock().iter().any(|line| line.contains(needle))
}
