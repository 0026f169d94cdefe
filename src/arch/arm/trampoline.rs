//! Trampoline into the loaded guest binary
//!
//! The companion core copies the guest's ARM9 binary into main RAM and
//! leaves the cartridge header, including the ARM9 entry point, at a fixed
//! address. Once the handshake has seen `BootBinary`, this module reads
//! that entry point, checks it, and jumps.
//!
//! # Safety
//!
//! Entering the guest is inherently unsafe:
//! - Nothing of this loader survives the jump
//! - The guest runs with whatever hardware state the reset sequencer left
//! - Control never returns
//!
//! The caller must ensure:
//! - The handshake reached its run state (companion sent `BootBinary`)
//! - The reset sequencer has completed
//! - The debug port is no longer needed

use crate::drivers::mmio::RegisterBus;

#[cfg(target_arch = "arm")]
core::arch::global_asm!(include_str!("trampoline.s"));

#[cfg(target_arch = "arm")]
unsafe extern "C" {
    /// Drain the write buffer, zero r0-r3 and branch to `entry` in ARM
    /// state (implemented in assembly).
    ///
    /// # Safety
    /// This function never returns.
    fn nitroboot_enter_guest(entry: usize) -> !;
}

/// Memory layout constants for the guest hand-off
pub mod layout {
    /// Loaded cartridge header (main RAM mirror).
    pub const HEADER_BASE: usize = 0x027F_FE00;

    /// Header field holding the ARM9 entry address.
    pub const ARM9_ENTRY: usize = HEADER_BASE + 0x24;

    /// Main RAM, including its mirrors. Guests must start inside it.
    pub const MAIN_RAM_BASE: usize = 0x0200_0000;
    pub const MAIN_RAM_END: usize = 0x0300_0000;
}

/// Trampoline error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrampolineError {
    /// Header holds no entry point
    NullEntry,

    /// Entry is not word aligned (ARM state requires it)
    Misaligned { entry: usize },

    /// Entry lies outside main RAM
    OutsideMainRam { entry: usize },
}

impl core::fmt::Display for TrampolineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TrampolineError::NullEntry => f.write_str("guest header has no ARM9 entry"),
            TrampolineError::Misaligned { entry } => {
                write!(f, "guest entry {:#010x} is not word aligned", entry)
            }
            TrampolineError::OutsideMainRam { entry } => {
                write!(f, "guest entry {:#010x} is outside main RAM", entry)
            }
        }
    }
}

/// ARM9 entry point recorded in the loaded header.
pub fn guest_entry<B: RegisterBus>(bus: &B) -> usize {
    bus.read32(layout::ARM9_ENTRY) as usize
}

/// Validate that `entry` can be jumped to
pub fn validate_entry(entry: usize) -> Result<(), TrampolineError> {
    if entry == 0 {
        return Err(TrampolineError::NullEntry);
    }

    if entry % 4 != 0 {
        return Err(TrampolineError::Misaligned { entry });
    }

    if !(layout::MAIN_RAM_BASE..layout::MAIN_RAM_END).contains(&entry) {
        return Err(TrampolineError::OutsideMainRam { entry });
    }

    Ok(())
}

/// Read and validate the guest entry point.
pub fn prepare<B: RegisterBus>(bus: &B) -> Result<usize, TrampolineError> {
    let entry = guest_entry(bus);
    validate_entry(entry)?;
    Ok(entry)
}

/// Jump into the guest at `entry`.
///
/// # Safety
///
/// `entry` must come from [`prepare`], and every precondition listed in the
/// module documentation must hold.
#[cfg(target_arch = "arm")]
pub unsafe fn enter_guest(entry: usize) -> ! {
    // SAFETY: the caller has validated the entry and finished with every
    // piece of loader state; the assembly never returns.
    unsafe { nitroboot_enter_guest(entry) }
}
