//! IPC sync register driver
//!
//! # Register layout (IPCSYNC, 0x04000180, 16-bit)
//!
//! | Bits  | Direction | Meaning |
//! |-------|-----------|---------|
//! | 0-3   | read      | Value latched by the companion core |
//! | 8-11  | write     | Value latched for the companion core |
//! | 13    | write     | Raise sync IRQ on the companion |
//! | 14    | r/w       | Accept sync IRQ from the companion |
//!
//! The boot stub runs with interrupts off, so bits 13 and 14 are always
//! written as zero.
//!
//! Alongside the latch, the companion posts a 32-bit status word into the
//! launcher settings block in main RAM. The latch says *where* the companion
//! is; the status word says *why* when that place is `Error`. The word
//! belongs to the companion: this side only ever reads it, so a code posted
//! between two polls can never be erased here.

use super::{MailboxLink, ProcessorState};
use crate::config::layout;
use crate::drivers::mmio::RegisterBus;

const REG_IPC_SYNC: usize = 0x0400_0180;

const SYNC_INPUT_MASK: u16 = 0x000F;
const SYNC_OUTPUT_SHIFT: u16 = 8;

/// Status word value meaning "nothing posted".
pub const STATUS_EMPTY: u32 = 0xFFFF_FFFF;

/// Hardware mailbox link over IPCSYNC.
pub struct IpcSync<B> {
    bus: B,
    status_word: usize,
    last_status: u32,
}

impl<B: RegisterBus> IpcSync<B> {
    /// Link using the status word in the standard launcher settings block.
    pub fn new(bus: B) -> Self {
        Self::with_status_word(bus, layout::STATUS_WORD)
    }

    pub fn with_status_word(bus: B, status_word: usize) -> Self {
        Self {
            bus,
            status_word,
            last_status: STATUS_EMPTY,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: RegisterBus> MailboxLink for IpcSync<B> {
    fn send(&mut self, state: ProcessorState) {
        let value = ((state.token() as u16) & SYNC_INPUT_MASK) << SYNC_OUTPUT_SHIFT;
        self.bus.write16(REG_IPC_SYNC, value);
    }

    fn recv(&self) -> ProcessorState {
        let raw = self.bus.read16(REG_IPC_SYNC) & SYNC_INPUT_MASK;
        ProcessorState::from_token(raw as u8)
    }

    fn poll_status(&mut self) -> Option<u32> {
        let raw = self.bus.read32(self.status_word);
        if raw == self.last_status {
            return None;
        }
        self.last_status = raw;
        if raw == STATUS_EMPTY {
            return None;
        }
        Some(raw)
    }
}
