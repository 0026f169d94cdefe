//! ARM9 general-purpose timers.
//!
//! Four 16-bit cascadable timers. The boot stub never runs them; it only
//! guarantees the guest finds every channel stopped with a zero reload
//! value.
//!
//! ## Register Layout (per channel, stride 4 bytes)
//!
//! | Offset | Register | Purpose |
//! |--------|----------|---------|
//! | +0x00  | DATA     | Counter (read) / reload value (write) |
//! | +0x02  | CR       | Prescaler, cascade, IRQ and start bits |

use crate::drivers::mmio::RegisterBus;

const TIMER_BASE: usize = 0x0400_0100;
const TIMER_STRIDE: usize = 4;

pub const CHANNEL_COUNT: usize = 4;

pub const fn data_reg(channel: usize) -> usize {
    TIMER_BASE + channel * TIMER_STRIDE
}

pub const fn control_reg(channel: usize) -> usize {
    TIMER_BASE + channel * TIMER_STRIDE + 2
}

/// Stop every timer and zero its reload value.
///
/// The control register is cleared first so the reload write cannot
/// restart a running counter.
pub fn reset_all<B: RegisterBus>(bus: &mut B) {
    for channel in 0..CHANNEL_COUNT {
        bus.write16(control_reg(channel), 0);
        bus.write16(data_reg(channel), 0);
    }
}
