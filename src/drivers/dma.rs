//! ARM9 DMA controller.
//!
//! Four channels, each with source, destination and control registers plus
//! an ARM9-only fill-data register. The boot stub uses channel 3 in
//! fixed-source mode as a memory fill engine, the same way the guest's
//! runtime does, and always hands every channel back zeroed.
//!
//! ## Register layout (per channel, stride 12 bytes from 0x040000B0)
//!
//! | Offset | Register | Purpose |
//! |--------|----------|---------|
//! | +0x00  | SAD      | Source address |
//! | +0x04  | DAD      | Destination address |
//! | +0x08  | CNT      | Word count (bits 0-20) and control (bits 21-31) |
//!
//! Fill data registers sit separately at 0x040000E0 + 4 * channel.

use crate::drivers::mmio::RegisterBus;

const DMA_BASE: usize = 0x0400_00B0;
const DMA_STRIDE: usize = 12;
const DMA_FILL_BASE: usize = 0x0400_00E0;

pub const CHANNEL_COUNT: usize = 4;

/// Channel used for bulk fills.
pub const FILL_CHANNEL: usize = 3;

/// Control register bits
mod cnt {
    pub const ENABLE: u32 = 1 << 31;
    pub const WORDS_32BIT: u32 = 1 << 26;
    pub const SRC_FIXED: u32 = 2 << 23;
    pub const COUNT_MASK: u32 = 0x001F_FFFF;
}

pub const fn src_reg(channel: usize) -> usize {
    DMA_BASE + channel * DMA_STRIDE
}

pub const fn dest_reg(channel: usize) -> usize {
    DMA_BASE + channel * DMA_STRIDE + 4
}

pub const fn control_reg(channel: usize) -> usize {
    DMA_BASE + channel * DMA_STRIDE + 8
}

pub const fn fill_reg(channel: usize) -> usize {
    DMA_FILL_BASE + channel * 4
}

/// Disable `channel` and zero its address, count and fill registers.
pub fn reset_channel<B: RegisterBus>(bus: &mut B, channel: usize) {
    bus.write32(control_reg(channel), 0);
    bus.write32(src_reg(channel), 0);
    bus.write32(dest_reg(channel), 0);
    bus.write32(fill_reg(channel), 0);
}

/// Reset every channel.
pub fn reset_all<B: RegisterBus>(bus: &mut B) {
    for channel in 0..CHANNEL_COUNT {
        reset_channel(bus, channel);
    }
}

/// Fill `len` bytes at `dest` with `value` using [`FILL_CHANNEL`].
///
/// `dest` and `len` must be word aligned. Blocks until the transfer is
/// complete, then leaves the channel zeroed.
pub fn fill<B: RegisterBus>(bus: &mut B, dest: usize, len: usize, value: u32) {
    let channel = FILL_CHANNEL;
    let max_chunk = cnt::COUNT_MASK as usize * 4;

    let mut offset = 0;
    while offset < len {
        let chunk = (len - offset).min(max_chunk);
        let words = (chunk / 4) as u32;

        bus.write32(fill_reg(channel), value);
        bus.write32(src_reg(channel), fill_reg(channel) as u32);
        bus.write32(dest_reg(channel), (dest + offset) as u32);
        bus.write32(
            control_reg(channel),
            cnt::ENABLE | cnt::SRC_FIXED | cnt::WORDS_32BIT | words,
        );
        while bus.read32(control_reg(channel)) & cnt::ENABLE != 0 {
            core::hint::spin_loop();
        }

        offset += chunk;
    }

    reset_channel(bus, channel);
}
