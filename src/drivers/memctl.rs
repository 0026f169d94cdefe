//! Memory control: shared WRAM, external memory and the extended
//! (TWL) system configuration block.
//!
//! The SCFG/MBK registers only exist on the extended hardware, and only
//! while SCFG_EXT bit 31 is set. Everything here that touches them must be
//! gated on [`extended_access`] having been observed at entry.

use crate::drivers::mmio::RegisterBus;

const REG_EXMEMCNT: usize = 0x0400_0204;
const REG_WRAMCNT: usize = 0x0400_0247;

pub const REG_SCFG_ROM: usize = 0x0400_4000;
pub const REG_SCFG_EXT: usize = 0x0400_4008;

/// SCFG_EXT: SCFG and MBK registers are accessible.
pub const SCFG_EXT_ACCESS: u32 = 1 << 31;
/// SCFG_ROM: the ARM9 has been switched to the legacy (NTR) BIOS.
pub const SCFG_ROM_NTR: u16 = 1 << 1;

/// All shared WRAM mapped to the companion core.
pub const WRAMCNT_ALL_TO_COMPANION: u8 = 0x03;
/// Slot-2 and card access owned by the companion, sync mode, main RAM
/// priority to the ARM7.
pub const EXMEMCNT_BASELINE: u16 = 0xE880;

/// WRAM bank control registers MBK1..MBK8.
pub mod mbk {
    pub const MBK1: usize = 0x0400_4040;
    pub const MBK2: usize = 0x0400_4044;
    pub const MBK3: usize = 0x0400_4048;
    pub const MBK4: usize = 0x0400_404C;
    pub const MBK5: usize = 0x0400_4050;
    pub const MBK6: usize = 0x0400_4054;
    pub const MBK7: usize = 0x0400_4058;
    pub const MBK8: usize = 0x0400_405C;

    pub const ALL: [usize; 8] = [MBK1, MBK2, MBK3, MBK4, MBK5, MBK6, MBK7, MBK8];
}

/// Which BIOS/memory map the extended hardware is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Legacy compatibility mode.
    Ntr,
    /// Native extended mode.
    Twl,
}

impl ExecMode {
    /// MBK1..MBK8 values the guest expects to find in this mode.
    pub const fn bank_profile(self) -> [u32; 8] {
        match self {
            ExecMode::Ntr => [
                0x8D89_8581,
                0x9189_8581,
                0x9199_9591,
                0x9189_8581,
                0x9199_9591,
                0x0000_3000,
                0x0000_3000,
                0x0000_3000,
            ],
            ExecMode::Twl => [
                0x8D89_8581,
                0x8C88_8480,
                0x9C98_9490,
                0x8C88_8480,
                0x9C98_9490,
                0x0940_3900,
                0x0980_3940,
                0x09C0_3980,
            ],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExecMode::Ntr => "NTR (compatibility)",
            ExecMode::Twl => "TWL (extended)",
        }
    }
}

/// Whether the extended configuration block is currently accessible.
pub fn extended_access<B: RegisterBus>(bus: &B) -> bool {
    bus.read32(REG_SCFG_EXT) & SCFG_EXT_ACCESS != 0
}

/// Mode reported by the hardware. Only meaningful with extended access.
pub fn exec_mode<B: RegisterBus>(bus: &B) -> ExecMode {
    if bus.read16(REG_SCFG_ROM) & SCFG_ROM_NTR != 0 {
        ExecMode::Ntr
    } else {
        ExecMode::Twl
    }
}

/// Hand all shared WRAM to the companion and set the external memory
/// baseline.
pub fn claim_shared_for_companion<B: RegisterBus>(bus: &mut B) {
    bus.write8(REG_WRAMCNT, WRAMCNT_ALL_TO_COMPANION);
    bus.write16(REG_EXMEMCNT, EXMEMCNT_BASELINE);
}

pub fn apply_bank_profile<B: RegisterBus>(bus: &mut B, mode: ExecMode) {
    for (reg, value) in mbk::ALL.iter().zip(mode.bank_profile()) {
        bus.write32(*reg, value);
    }
}

/// Close the extended configuration block for the rest of this boot.
pub fn release_extended_access<B: RegisterBus>(bus: &mut B) {
    bus.modify32(REG_SCFG_EXT, |v| v & !SCFG_EXT_ACCESS);
}
