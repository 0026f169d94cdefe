//! Boot configuration.
//!
//! Two sources, combined: the `debug-console` cargo feature, and the
//! launcher settings block that the menu leaves in main RAM before
//! rebooting into the loader. The block survives the reboot because main
//! RAM is not cleared, but it is only trusted when its magic matches.

use crate::drivers::mmio::RegisterBus;
use crate::drivers::tty::console;
use crate::drivers::video::{VramBank, VramBanks};

/// Fixed addresses shared with the launcher and the companion core
pub mod layout {
    /// Launcher settings block (main RAM mirror).
    pub const LAUNCHER_SETTINGS: usize = 0x027F_C000;

    pub const SETTINGS_MAGIC: usize = LAUNCHER_SETTINGS;
    pub const SETTINGS_FLAGS: usize = LAUNCHER_SETTINGS + 0x04;

    /// Status word the companion core posts its progress/error code into.
    pub const STATUS_WORD: usize = LAUNCHER_SETTINGS + 0x08;
}

/// "NBLS", little endian.
pub const SETTINGS_MAGIC: u32 = u32::from_le_bytes(*b"NBLS");

mod flags {
    pub const DEBUG_CONSOLE: u32 = 1 << 0;
}

/// VRAM holding this loader's code. Never blanked.
pub const LOADER_BANKS: VramBanks = VramBanks::empty().with(VramBank::C);

/// Settings for one boot attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Show transient status codes on screen while booting.
    pub debug: bool,
    /// Banks the reset sequencer must leave mapped and intact.
    pub resident_banks: VramBanks,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::new(cfg!(feature = "debug-console"))
    }
}

impl BootConfig {
    /// With the debug console on, its backing bank stays resident too.
    pub const fn new(debug: bool) -> Self {
        let resident_banks = if debug {
            LOADER_BANKS.with(console::BACKING_BANK)
        } else {
            LOADER_BANKS
        };
        Self {
            debug,
            resident_banks,
        }
    }

    /// Build-time defaults overlaid with the launcher settings block.
    pub fn load<B: RegisterBus>(bus: &B) -> Self {
        let mut config = Self::default();

        if bus.read32(layout::SETTINGS_MAGIC) != SETTINGS_MAGIC {
            log::debug!("no launcher settings, using build defaults");
            return config;
        }

        let flags = bus.read32(layout::SETTINGS_FLAGS);
        if flags & flags::DEBUG_CONSOLE != 0 {
            config = Self::new(true);
        }
        config
    }
}
