//! Reset profile detection (basic vs extended hardware)

use crate::drivers::memctl::{self, ExecMode};
use crate::drivers::mmio::RegisterBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetProfile {
    Basic,              // First-generation hardware, or extended registers locked
    Extended(ExecMode), // SCFG/MBK accessible at entry
}

impl ResetProfile {
    /// Read the capability register once. The mode register is only read
    /// when the capability bit says it exists.
    pub fn detect<B: RegisterBus>(bus: &B) -> Self {
        if memctl::extended_access(bus) {
            ResetProfile::Extended(memctl::exec_mode(bus))
        } else {
            ResetProfile::Basic
        }
    }

    pub fn from_registers(scfg_ext: u32, scfg_rom: u16) -> Self {
        if scfg_ext & memctl::SCFG_EXT_ACCESS == 0 {
            ResetProfile::Basic
        } else if scfg_rom & memctl::SCFG_ROM_NTR != 0 {
            ResetProfile::Extended(ExecMode::Ntr)
        } else {
            ResetProfile::Extended(ExecMode::Twl)
        }
    }

    pub fn is_basic(self) -> bool {
        matches!(self, ResetProfile::Basic)
    }

    pub fn is_extended(self) -> bool {
        matches!(self, ResetProfile::Extended(_))
    }

    pub fn exec_mode(self) -> Option<ExecMode> {
        match self {
            ResetProfile::Basic => None,
            ResetProfile::Extended(mode) => Some(mode),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ResetProfile::Basic => "basic",
            ResetProfile::Extended(ExecMode::Ntr) => "extended, NTR mode",
            ResetProfile::Extended(ExecMode::Twl) => "extended, TWL mode",
        }
    }
}

impl core::fmt::Display for ResetProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}
