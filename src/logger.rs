//! `log` facade backend writing to the debug port.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct PortLogger;

static LOGGER: PortLogger = PortLogger;

impl Log for PortLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::println!("[{:<5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Install the debug port logger.
///
/// # Safety
///
/// The ARM9 has no compare-and-swap, so the logger is installed with the
/// racy setters. Call once, before anything logs, with interrupts off.
pub unsafe fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    // SAFETY: single core, interrupts masked, called once at entry.
    unsafe {
        log::set_logger_racy(&LOGGER)?;
        log::set_max_level_racy(level);
    }
    Ok(())
}

/// Level used by the boot binary.
pub fn default_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
