//! The ARM9 side of the boot hand-off.
//!
//! - `handshake`: state machine synchronizing with the companion core
//! - `reset`: ordered hardware teardown run once during the handshake
//! - `diagnostics`: error/status text on the sub screen
//!
//! Everything a boot attempt mutates lives in one [`BootSession`], created
//! at entry and dropped when the stub halts or jumps into the guest.

pub mod diagnostics;
pub mod handshake;
pub mod reset;

pub use diagnostics::Diagnostics;
pub use handshake::{Handshake, LocalState};
pub use reset::ResetSequencer;

use crate::config::BootConfig;
use crate::drivers::tty::Console;

/// Status and failure codes shown by the diagnostics console.
///
/// `Status*` codes are informational and only shown in debug mode. The
/// others are reported by the companion core when it gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    None = 0x00,
    StatusClearingMemory = 0x01,
    StatusLoadingBinary = 0x02,
    StatusStartingBinary = 0x03,
    StatusBootloaderStartup = 0x04,
    StorageInitFailed = 0x10,
    FileLoadFailed = 0x11,
}

impl ErrorCode {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x00 => Some(ErrorCode::None),
            0x01 => Some(ErrorCode::StatusClearingMemory),
            0x02 => Some(ErrorCode::StatusLoadingBinary),
            0x03 => Some(ErrorCode::StatusStartingBinary),
            0x04 => Some(ErrorCode::StatusBootloaderStartup),
            0x10 => Some(ErrorCode::StorageInitFailed),
            0x11 => Some(ErrorCode::FileLoadFailed),
            _ => None,
        }
    }

    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Whether the code describes a failure rather than progress.
    pub const fn is_failure(self) -> bool {
        matches!(self, ErrorCode::StorageInitFailed | ErrorCode::FileLoadFailed)
    }
}

/// State of one boot attempt.
///
/// The error code is kept raw: the companion can post any word, and
/// deciding what an unknown value means is the reporter's job.
#[derive(Debug)]
pub struct BootSession {
    debug: bool,
    error_code: u32,
    diagnostics: Option<Diagnostics>,
}

impl BootSession {
    pub fn new(config: &BootConfig) -> Self {
        Self {
            debug: config.debug,
            error_code: ErrorCode::None.raw(),
            diagnostics: None,
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_raw(self.error_code)
    }

    pub fn raw_error_code(&self) -> u32 {
        self.error_code
    }

    pub fn set_error_code(&mut self, code: ErrorCode) {
        self.error_code = code.raw();
    }

    /// Adopt a status word posted by the companion.
    pub fn mirror(&mut self, raw: u32) {
        if raw != self.error_code {
            log::debug!("companion status {:#x}", raw);
        }
        self.error_code = raw;
    }

    pub fn clear_error_code(&mut self) {
        self.error_code = ErrorCode::None.raw();
    }

    /// A code other than `None` is waiting to be shown.
    pub fn has_pending_status(&self) -> bool {
        self.error_code != ErrorCode::None.raw()
    }

    /// A progress code, as opposed to a failure, is waiting to be shown.
    /// Failures are left for the halt path to report.
    pub fn has_pending_progress(&self) -> bool {
        self.has_pending_status() && !self.error_code().is_some_and(ErrorCode::is_failure)
    }

    /// Whether the diagnostics console has been opened yet.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        self.diagnostics.as_ref()
    }

    /// Record that the display has refreshed since the last report.
    pub fn note_refresh(&mut self) {
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.note_refresh();
        }
    }

    /// Render the current code, opening the console on first use.
    /// Returns whether anything was drawn.
    pub fn report<C: Console>(&mut self, console: &mut C) -> bool {
        let code = self.error_code;
        let diagnostics = self
            .diagnostics
            .get_or_insert_with(|| Diagnostics::open(console));
        diagnostics.report(console, code)
    }
}
