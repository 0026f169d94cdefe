//! VRAM bank control.
//!
//! Nine banks, A..I, each with an 8-bit control register. Setting a bank's
//! control to `0x80` (enabled, MST 0) maps it at its fixed LCDC address
//! where the CPU and DMA can reach it; `0` unmaps it.
//!
//! | Bank | Control    | LCDC address | Size    |
//! |------|------------|--------------|---------|
//! | A    | 0x04000240 | 0x06800000   | 128 KiB |
//! | B    | 0x04000241 | 0x06820000   | 128 KiB |
//! | C    | 0x04000242 | 0x06840000   | 128 KiB |
//! | D    | 0x04000243 | 0x06860000   | 128 KiB |
//! | E    | 0x04000244 | 0x06880000   | 64 KiB  |
//! | F    | 0x04000245 | 0x06890000   | 16 KiB  |
//! | G    | 0x04000246 | 0x06894000   | 16 KiB  |
//! | H    | 0x04000248 | 0x06898000   | 32 KiB  |
//! | I    | 0x04000249 | 0x068A0000   | 16 KiB  |
//!
//! 0x04000247 between G and H is WRAMCNT, not a VRAM control.
//!
//! Bank H can also be mapped as sub-engine background memory at
//! 0x06200000 (`0x81`), which is where the diagnostics console lives.

use crate::drivers::dma;
use crate::drivers::mmio::RegisterBus;

/// Control value mapping a bank to LCDC.
pub const CR_LCDC: u8 = 0x80;
/// Control value mapping bank H to sub-engine background VRAM.
pub const CR_SUB_BG: u8 = 0x81;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VramBank {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl VramBank {
    pub const ALL: [VramBank; 9] = [
        VramBank::A,
        VramBank::B,
        VramBank::C,
        VramBank::D,
        VramBank::E,
        VramBank::F,
        VramBank::G,
        VramBank::H,
        VramBank::I,
    ];

    pub const fn control_reg(self) -> usize {
        match self {
            VramBank::A => 0x0400_0240,
            VramBank::B => 0x0400_0241,
            VramBank::C => 0x0400_0242,
            VramBank::D => 0x0400_0243,
            VramBank::E => 0x0400_0244,
            VramBank::F => 0x0400_0245,
            VramBank::G => 0x0400_0246,
            VramBank::H => 0x0400_0248,
            VramBank::I => 0x0400_0249,
        }
    }

    pub const fn lcdc_base(self) -> usize {
        match self {
            VramBank::A => 0x0680_0000,
            VramBank::B => 0x0682_0000,
            VramBank::C => 0x0684_0000,
            VramBank::D => 0x0686_0000,
            VramBank::E => 0x0688_0000,
            VramBank::F => 0x0689_0000,
            VramBank::G => 0x0689_4000,
            VramBank::H => 0x0689_8000,
            VramBank::I => 0x068A_0000,
        }
    }

    pub const fn size(self) -> usize {
        match self {
            VramBank::A | VramBank::B | VramBank::C | VramBank::D => 128 * 1024,
            VramBank::E => 64 * 1024,
            VramBank::F | VramBank::G | VramBank::I => 16 * 1024,
            VramBank::H => 32 * 1024,
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of VRAM banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VramBanks(u16);

impl VramBanks {
    pub const fn empty() -> Self {
        VramBanks(0)
    }

    pub const fn with(self, bank: VramBank) -> Self {
        VramBanks(self.0 | bank.bit())
    }

    pub const fn contains(self, bank: VramBank) -> bool {
        self.0 & bank.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = VramBank> {
        VramBank::ALL.into_iter().filter(move |bank| self.contains(*bank))
    }
}

/// Map `bank` to LCDC, zero it, and leave it unmapped.
pub fn blank<B: RegisterBus>(bus: &mut B, bank: VramBank) {
    bus.write8(bank.control_reg(), CR_LCDC);
    dma::fill(bus, bank.lcdc_base(), bank.size(), 0);
    bus.write8(bank.control_reg(), 0);
}

/// Blank every bank not in `resident`. Banks in `resident` hold live code
/// and keep both their contents and their mapping.
pub fn blank_all_except<B: RegisterBus>(bus: &mut B, resident: VramBanks) {
    for bank in VramBank::ALL {
        if resident.contains(bank) {
            continue;
        }
        blank(bus, bank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    #[test]
    fn lcdc_windows_are_contiguous() {
        for pair in VramBank::ALL.windows(2) {
            assert_eq!(pair[0].lcdc_base() + pair[0].size(), pair[1].lcdc_base());
        }
    }

    #[test]
    fn bank_set_membership() {
        let set = VramBanks::empty().with(VramBank::C).with(VramBank::H);
        assert!(set.contains(VramBank::C));
        assert!(set.contains(VramBank::H));
        assert!(!set.contains(VramBank::A));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![VramBank::C, VramBank::H]);
        assert_eq!(VramBanks::default(), VramBanks::empty());
    }

    #[test]
    fn blank_maps_fills_and_unmaps() {
        let mut bus = FakeBus::new();
        blank(&mut bus, VramBank::F);

        assert_eq!(bus.writes_to(VramBank::F.control_reg()), vec![0x80, 0]);
        let base = VramBank::F.lcdc_base();
        assert_eq!(bus.read32(base), 0);
        assert_eq!(bus.read32(base + VramBank::F.size() - 4), 0);
        // Bank G starts right after F and is untouched.
        assert_eq!(bus.read32(VramBank::G.lcdc_base()), FakeBus::POISON32);
    }

    #[test]
    fn resident_bank_is_left_alone() {
        let mut bus = FakeBus::new();
        let resident = VramBanks::empty().with(VramBank::C);
        blank_all_except(&mut bus, resident);

        assert!(bus.writes_to(VramBank::C.control_reg()).is_empty());
        let c = VramBank::C.lcdc_base();
        assert_eq!(bus.read32(c), FakeBus::POISON32);
        assert_eq!(bus.read32(c + VramBank::C.size() - 4), FakeBus::POISON32);

        for bank in VramBank::ALL.into_iter().filter(|b| *b != VramBank::C) {
            assert_eq!(bus.read8(bank.control_reg()), 0);
            assert_eq!(bus.read32(bank.lcdc_base()), 0);
            assert_eq!(bus.read32(bank.lcdc_base() + bank.size() - 4), 0);
        }
    }
}
