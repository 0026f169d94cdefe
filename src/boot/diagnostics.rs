//! Boot diagnostics on the sub screen.
//!
//! A one-line window in the middle of the screen shows either a progress
//! status (debug builds) or the failure the companion core gave up with.
//! The same code is not redrawn until the display has refreshed, so a
//! status polled in a tight loop does not flood the console.

use super::ErrorCode;
use crate::drivers::tty::Console;

/// Console window used for diagnostics: (x, y, width, height) in cells.
pub const VIEWPORT: (u8, u8, u8, u8) = (5, 11, 24, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Status,
    Error,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Status => "STATUS: ",
            Category::Error => "ERROR: ",
        }
    }
}

/// Category and message shown for `code`.
pub const fn describe(code: ErrorCode) -> (Category, &'static str) {
    match code {
        ErrorCode::None => (Category::Status, "NONE"),
        ErrorCode::StatusClearingMemory => (Category::Status, "CLEAR MEMORY"),
        ErrorCode::StatusLoadingBinary => (Category::Status, "LOAD CART"),
        ErrorCode::StatusStartingBinary => (Category::Status, "START BINARY"),
        ErrorCode::StatusBootloaderStartup => (Category::Status, "BOOTLOADER STARTUP"),
        ErrorCode::StorageInitFailed => (Category::Error, "SD INIT FAIL"),
        ErrorCode::FileLoadFailed => (Category::Error, "FILE LOAD FAIL"),
    }
}

/// An open diagnostics window and its redraw state.
#[derive(Debug)]
pub struct Diagnostics {
    last_rendered: Option<u32>,
    refreshed: bool,
}

impl Diagnostics {
    /// Point `console` at the diagnostics window.
    pub fn open<C: Console>(console: &mut C) -> Self {
        let (x, y, width, height) = VIEWPORT;
        console.set_viewport(x, y, width, height);
        Self {
            last_rendered: None,
            refreshed: false,
        }
    }

    /// Draw `raw` unless it is unknown or a repeat of the last code drawn
    /// since the previous refresh. Returns whether anything was drawn.
    pub fn report<C: Console>(&mut self, console: &mut C, raw: u32) -> bool {
        let Some(code) = ErrorCode::from_raw(raw) else {
            log::warn!("dropping unknown diagnostic code {:#x}", raw);
            return false;
        };

        if self.last_rendered == Some(raw) && !self.refreshed {
            return false;
        }

        let (category, message) = describe(code);
        console.print("\n");
        console.print(category.label());
        console.print(message);

        if code.is_failure() {
            log::error!("{}{}", category.label(), message);
        } else {
            log::info!("{}{}", category.label(), message);
        }

        self.last_rendered = Some(raw);
        self.refreshed = false;
        true
    }

    /// The display has refreshed; the next report is drawn even if it
    /// repeats the previous one.
    pub fn note_refresh(&mut self) {
        self.refreshed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingConsole;

    #[test]
    fn open_sets_viewport_once() {
        let mut console = RecordingConsole::default();
        let _diagnostics = Diagnostics::open(&mut console);
        assert_eq!(console.viewports, vec![(5, 11, 24, 1)]);
        assert!(console.text.is_empty());
    }

    #[test]
    fn none_renders_status_label() {
        let mut console = RecordingConsole::default();
        let mut diagnostics = Diagnostics::open(&mut console);
        assert!(diagnostics.report(&mut console, ErrorCode::None.raw()));
        assert_eq!(console.text, "\nSTATUS: NONE");
    }

    #[test]
    fn storage_failure_renders_error_label() {
        let mut console = RecordingConsole::default();
        let mut diagnostics = Diagnostics::open(&mut console);
        assert!(diagnostics.report(&mut console, ErrorCode::StorageInitFailed.raw()));
        assert_eq!(console.text, "\nERROR: SD INIT FAIL");
    }

    #[test]
    fn every_code_has_text() {
        assert_eq!(describe(ErrorCode::StatusClearingMemory).1, "CLEAR MEMORY");
        assert_eq!(describe(ErrorCode::StatusLoadingBinary).1, "LOAD CART");
        assert_eq!(describe(ErrorCode::StatusStartingBinary).1, "START BINARY");
        assert_eq!(
            describe(ErrorCode::StatusBootloaderStartup),
            (Category::Status, "BOOTLOADER STARTUP")
        );
        assert_eq!(
            describe(ErrorCode::FileLoadFailed),
            (Category::Error, "FILE LOAD FAIL")
        );
    }

    #[test]
    fn repeat_before_refresh_is_debounced() {
        let mut console = RecordingConsole::default();
        let mut diagnostics = Diagnostics::open(&mut console);
        let code = ErrorCode::StorageInitFailed.raw();

        assert!(diagnostics.report(&mut console, code));
        assert!(!diagnostics.report(&mut console, code));
        assert_eq!(console.text, "\nERROR: SD INIT FAIL");

        diagnostics.note_refresh();
        assert!(diagnostics.report(&mut console, code));
        assert_eq!(console.text, "\nERROR: SD INIT FAIL\nERROR: SD INIT FAIL");
    }

    #[test]
    fn different_code_is_not_debounced() {
        let mut console = RecordingConsole::default();
        let mut diagnostics = Diagnostics::open(&mut console);

        assert!(diagnostics.report(&mut console, ErrorCode::StatusLoadingBinary.raw()));
        assert!(diagnostics.report(&mut console, ErrorCode::StatusStartingBinary.raw()));
        assert_eq!(console.text, "\nSTATUS: LOAD CART\nSTATUS: START BINARY");
    }

    #[test]
    fn unknown_code_is_dropped_silently() {
        let mut console = RecordingConsole::default();
        let mut diagnostics = Diagnostics::open(&mut console);

        assert!(!diagnostics.report(&mut console, 0x42));
        assert!(console.text.is_empty());

        // An unknown code does not reset the debounce state.
        assert!(diagnostics.report(&mut console, ErrorCode::None.raw()));
        assert!(!diagnostics.report(&mut console, 0x42));
        assert!(!diagnostics.report(&mut console, ErrorCode::None.raw()));
    }
}
