//! Register bus abstraction over the ARM9 physical address space.
//!
//! Every driver in this crate talks to hardware through [`RegisterBus`]
//! rather than raw pointers, so the handshake and reset logic can run
//! unchanged against the in-memory bus used by the test suite.
//!
//! The hardware implementation, [`Mmio`], performs volatile accesses of the
//! exact width requested. Width matters on this machine: palette RAM and
//! VRAM ignore 8-bit writes, and several I/O registers are only 8 or 16
//! bits wide.

use volatile::Volatile;

/// Width-exact access to memory-mapped registers and memories.
pub trait RegisterBus {
    fn read8(&self, addr: usize) -> u8;
    fn read16(&self, addr: usize) -> u16;
    fn read32(&self, addr: usize) -> u32;

    fn write8(&mut self, addr: usize, value: u8);
    fn write16(&mut self, addr: usize, value: u16);
    fn write32(&mut self, addr: usize, value: u32);

    /// Read-modify-write of a 32-bit register.
    fn modify32(&mut self, addr: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read32(addr);
        self.write32(addr, f(value));
    }

    /// Store `value` into every word of `[addr, addr + len)`.
    ///
    /// `addr` and `len` must be word aligned. This is the CPU path; bulk
    /// clears of video memory go through [`crate::drivers::dma::fill`].
    fn fill32(&mut self, addr: usize, len: usize, value: u32) {
        for offset in (0..len).step_by(4) {
            self.write32(addr + offset, value);
        }
    }
}

/// Volatile access to the real ARM9 bus.
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create a handle to the hardware bus.
    ///
    /// # Safety
    ///
    /// Must only be called on the ARM9 with the boot-time memory map in
    /// place: ITCM mirrored at 0x01FF8000, DTCM at 0x00800000 and the I/O
    /// block at 0x04000000. Every address later passed to the returned bus
    /// is dereferenced without further checks.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    #[inline]
    fn reg<T: Copy>(addr: usize) -> *mut Volatile<T> {
        addr as *mut Volatile<T>
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read8(&self, addr: usize) -> u8 {
        // SAFETY: construction of `Mmio` promised a valid ARM9 memory map.
        unsafe { (*Self::reg::<u8>(addr)).read() }
    }

    #[inline]
    fn read16(&self, addr: usize) -> u16 {
        // SAFETY: see `read8`; halfword registers are 2-byte aligned.
        unsafe { (*Self::reg::<u16>(addr)).read() }
    }

    #[inline]
    fn read32(&self, addr: usize) -> u32 {
        // SAFETY: see `read8`; word registers are 4-byte aligned.
        unsafe { (*Self::reg::<u32>(addr)).read() }
    }

    #[inline]
    fn write8(&mut self, addr: usize, value: u8) {
        // SAFETY: see `read8`.
        unsafe { (*Self::reg::<u8>(addr)).write(value) }
    }

    #[inline]
    fn write16(&mut self, addr: usize, value: u16) {
        // SAFETY: see `read16`.
        unsafe { (*Self::reg::<u16>(addr)).write(value) }
    }

    #[inline]
    fn write32(&mut self, addr: usize, value: u32) {
        // SAFETY: see `read32`.
        unsafe { (*Self::reg::<u32>(addr)).write(value) }
    }
}

impl<B: RegisterBus> RegisterBus for &mut B {
    fn read8(&self, addr: usize) -> u8 {
        (**self).read8(addr)
    }

    fn read16(&self, addr: usize) -> u16 {
        (**self).read16(addr)
    }

    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    fn write8(&mut self, addr: usize, value: u8) {
        (**self).write8(addr, value)
    }

    fn write16(&mut self, addr: usize, value: u16) {
        (**self).write16(addr, value)
    }

    fn write32(&mut self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }

    fn fill32(&mut self, addr: usize, len: usize, value: u32) {
        (**self).fill32(addr, len, value)
    }
}
