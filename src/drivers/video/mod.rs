//! 2D display engines, palette/OAM memory and power control.
//!
//! The main engine's registers start at 0x04000000 and the sub engine's at
//! 0x04001000; both occupy 0x00..0x56. On the main engine that window also
//! holds DISPSTAT and VCOUNT. VCOUNT is the live scanline counter: writing
//! it re-times the display, so it is never part of a register sweep.

pub mod vram;

use crate::drivers::dma;
use crate::drivers::mmio::RegisterBus;

pub use vram::{VramBank, VramBanks};

pub const MAIN_ENGINE: usize = 0x0400_0000;
pub const SUB_ENGINE: usize = 0x0400_1000;

/// Size of each engine's register window.
pub const ENGINE_REGS_LEN: usize = 0x56;

pub const REG_DISPCNT: usize = MAIN_ENGINE;
pub const REG_DISPCNT_SUB: usize = SUB_ENGINE;
pub const REG_BG0CNT_SUB: usize = SUB_ENGINE + 0x08;
pub const REG_DISPSTAT: usize = 0x0400_0004;
pub const REG_VCOUNT: usize = 0x0400_0006;
pub const REG_POWERCNT: usize = 0x0400_0304;

/// LCDs on, both 2D engines and the 3D render/geometry engines on, main
/// engine on the top screen.
pub const POWERCNT_BASELINE: u16 = 0x820F;

/// Scanline at which the visible frame ends.
pub const REFRESH_LINE: u16 = 191;

pub const PALETTE_RAM: usize = 0x0500_0000;
/// Main and sub engine BG + OBJ palettes.
pub const PALETTE_LEN: usize = 0x800;
/// Sub engine BG palette, sixteen banks of sixteen colours.
pub const SUB_BG_PALETTE: usize = PALETTE_RAM + 0x400;
pub const OAM: usize = 0x0700_0000;
pub const OAM_LEN: usize = 0x800;

/// Value left in background palette entry 0.
pub const BACKDROP_WHITE: u16 = 0xFFFF;

/// Busy-wait for the next display refresh edge: VCOUNT entering and then
/// leaving [`REFRESH_LINE`].
pub fn wait_for_refresh_edge<B: RegisterBus>(bus: &B) {
    while bus.read16(REG_VCOUNT) != REFRESH_LINE {
        core::hint::spin_loop();
    }
    while bus.read16(REG_VCOUNT) == REFRESH_LINE {
        core::hint::spin_loop();
    }
}

/// Zero both engines' register windows, reset display status and modes,
/// and apply the power baseline.
pub fn reset_engines<B: RegisterBus>(bus: &mut B) {
    for engine in [MAIN_ENGINE, SUB_ENGINE] {
        for offset in (0..ENGINE_REGS_LEN).step_by(2) {
            let addr = engine + offset;
            if addr == REG_VCOUNT {
                continue;
            }
            bus.write16(addr, 0);
        }
    }

    bus.write16(REG_DISPSTAT, 0);
    bus.write32(REG_DISPCNT, 0);
    bus.write32(REG_DISPCNT_SUB, 0);
    bus.write16(REG_POWERCNT, POWERCNT_BASELINE);
}

/// Clear palette RAM and OAM, leaving a white backdrop in entry 0.
pub fn reset_palettes_and_oam<B: RegisterBus>(bus: &mut B) {
    dma::fill(bus, PALETTE_RAM, PALETTE_LEN, 0);
    bus.write16(PALETTE_RAM, BACKDROP_WHITE);
    dma::fill(bus, OAM, OAM_LEN, 0);
}
