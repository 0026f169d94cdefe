//! Hardware reset sequencer.
//!
//! Brings every piece of ARM9-visible state the guest could depend on back
//! to its power-on baseline, in a fixed order. The basic profile covers the
//! hardware every model has; the extended profile adds the bank
//! configuration, video memory and display registers that only exist (or
//! only matter) on the extended hardware, and finally locks the extended
//! configuration block.
//!
//! The order is part of the contract:
//!
//! 1. shared WRAM and external memory control
//! 2. WRAM bank profile (extended)
//! 3. tightly coupled memories
//! 4. IPC FIFO
//! 5. DMA channels and timers
//! 6. VRAM banks (extended)
//! 7. palette and OAM (extended)
//! 8. display engines and power (extended)
//! 9. extended configuration lock (extended)
//!
//! VRAM, palette and OAM clears use DMA, so DMA must be quiescent (step 5)
//! before they run, and is handed back zeroed after each fill.

use crate::config::BootConfig;
use crate::drivers::ipc::fifo;
use crate::drivers::mmio::RegisterBus;
use crate::drivers::video::{self, vram, VramBanks};
use crate::drivers::{dma, memctl, timer};
use crate::profile::ResetProfile;

/// Tightly coupled memory layout
pub mod tcm {
    /// ITCM through its upper mirror; the low mirror at 0 overlaps the
    /// exception vectors.
    pub const ITCM_BASE: usize = 0x01FF_8000;
    pub const ITCM_LEN: usize = 0x8000;

    pub const DTCM_BASE: usize = 0x0080_0000;
    pub const DTCM_LEN: usize = 0x4000;

    /// BIOS interrupt-wait flags.
    pub const WAIT_FLAGS: usize = DTCM_BASE + 0x3FF8;
    /// User IRQ handler pointer.
    pub const IRQ_HANDLER: usize = DTCM_BASE + 0x3FFC;

    /// No interrupt is being waited on.
    pub const WAIT_FLAGS_IDLE: u32 = 0xFFFF_FFFF;
    /// No handler installed.
    pub const IRQ_HANDLER_NONE: u32 = 0;
}

/// Zero both TCMs, leaving the two reserved DTCM cells at their idle values.
pub fn clear_tcm<B: RegisterBus>(bus: &mut B) {
    bus.fill32(tcm::ITCM_BASE, tcm::ITCM_LEN, 0);
    bus.fill32(tcm::DTCM_BASE, tcm::WAIT_FLAGS - tcm::DTCM_BASE, 0);
    bus.write32(tcm::WAIT_FLAGS, tcm::WAIT_FLAGS_IDLE);
    bus.write32(tcm::IRQ_HANDLER, tcm::IRQ_HANDLER_NONE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSequencer {
    profile: ResetProfile,
    resident_banks: VramBanks,
}

impl ResetSequencer {
    pub fn new(profile: ResetProfile, resident_banks: VramBanks) -> Self {
        Self {
            profile,
            resident_banks,
        }
    }

    /// Sequencer for the hardware behind `bus`. Reads the capability
    /// register once; the result holds for the whole boot.
    pub fn detect<B: RegisterBus>(bus: &B, config: &BootConfig) -> Self {
        Self::new(ResetProfile::detect(bus), config.resident_banks)
    }

    pub fn profile(&self) -> ResetProfile {
        self.profile
    }

    pub fn resident_banks(&self) -> VramBanks {
        self.resident_banks
    }

    /// Run the full sequence. Cannot fail; on return every covered region
    /// holds its baseline.
    pub fn run<B: RegisterBus>(&self, bus: &mut B) {
        log::debug!("reset: {} profile", self.profile);

        memctl::claim_shared_for_companion(bus);
        if let ResetProfile::Extended(mode) = self.profile {
            memctl::apply_bank_profile(bus, mode);
        }

        clear_tcm(bus);
        fifo::reset(bus);
        dma::reset_all(bus);
        timer::reset_all(bus);

        if self.profile.is_basic() {
            return;
        }

        vram::blank_all_except(bus, self.resident_banks);
        video::reset_palettes_and_oam(bus);
        video::reset_engines(bus);
        memctl::release_extended_access(bus);
    }
}
