//! ARM9 interrupt controller.
//!
//! The boot stub never takes an interrupt. It switches the controller off
//! at entry and acknowledges anything already pending so the guest starts
//! from a clean request register.

use crate::drivers::mmio::RegisterBus;

/// Interrupt Master Enable (bit 0).
const REG_IME: usize = 0x0400_0208;
/// Interrupt Enable, one bit per source.
const REG_IE: usize = 0x0400_0210;
/// Interrupt Request flags, write 1 to acknowledge.
const REG_IF: usize = 0x0400_0214;

/// Mask every interrupt source and acknowledge all pending requests.
pub fn disable_all<B: RegisterBus>(bus: &mut B) {
    bus.write32(REG_IME, 0);
    bus.write32(REG_IE, 0);
    bus.write32(REG_IF, !0);
}
