//! Emulator debug port for text output.
//!
//! The console has no serial port. Emulators used for boot bring-up
//! (no$gba, melonDS) expose a byte-wide "char out" register in unmapped I/O
//! space; writing a byte there appends it to the emulator's debug log. On
//! real hardware the write lands in open bus and is discarded, so leaving
//! the port enabled is harmless.

use core::fmt;
use lazy_static::lazy_static;
use spin::Mutex;

/// Char-out register of the emulator debug interface.
const CHAR_OUT: usize = 0x04FF_FA1C;

lazy_static! {
    pub static ref WRITER: Mutex<DebugPortWriter> = Mutex::new(DebugPortWriter::new());
}

/// Writer for the emulator debug port
pub struct DebugPortWriter {
    enabled: bool,
}

impl Default for DebugPortWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugPortWriter {
    pub const fn new() -> Self {
        DebugPortWriter { enabled: true }
    }

    /// Stop forwarding output, e.g. once the guest owns the I/O space.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Write a single byte to the port
    pub fn write_byte(&mut self, byte: u8) {
        if self.enabled {
            emit(byte);
        }
    }

    /// Write a string to the port
    pub fn write_string(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }
}

impl fmt::Write for DebugPortWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}

#[cfg(target_arch = "arm")]
#[inline]
fn emit(byte: u8) {
    // SAFETY: CHAR_OUT is in the I/O block; unclaimed addresses there are
    // open bus on hardware, so a byte store has no side effects beyond the
    // emulator hook.
    unsafe { core::ptr::write_volatile(CHAR_OUT as *mut u8, byte) }
}

/// Host builds have no debug port.
#[cfg(not(target_arch = "arm"))]
#[inline]
fn emit(_byte: u8) {
    let _ = CHAR_OUT;
}
