//! IPC FIFO control
//!
//! The word FIFO is a separate transport from the sync latch: resetting it
//! does not disturb the latched sync value. The boot stub never uses the
//! FIFO, it only hands it to the guest empty and disabled.

use crate::drivers::mmio::RegisterBus;

const REG_IPC_FIFO_CR: usize = 0x0400_0184;

/// Flush the send FIFO (write-only strobe).
const FIFO_SEND_CLEAR: u16 = 1 << 3;
/// FIFO enable; the clear strobe only takes effect while enabled.
const FIFO_ENABLE: u16 = 1 << 15;

/// Flush the send FIFO and leave the FIFO disabled.
pub fn reset<B: RegisterBus>(bus: &mut B) {
    bus.write16(REG_IPC_FIFO_CR, FIFO_ENABLE | FIFO_SEND_CLEAR);
    bus.write16(REG_IPC_FIFO_CR, 0);
}
