//! ARM946E-S cache maintenance.
//!
//! 8 KiB instruction cache and 4 KiB data cache, 4-way set associative with
//! 32-byte lines. The data cache is cleaned by set/way index because the
//! ARM946E-S has no "clean entire cache" operation.

/// Data cache line size.
pub const LINE_SIZE: u32 = 32;
/// Bytes per data cache way.
pub const DCACHE_WAY_SIZE: u32 = 4 * 1024 / 4;

/// Write back and invalidate the data cache, drain the write buffer, and
/// invalidate the instruction cache.
///
/// Must run before TCM and VRAM are rewritten, so no dirty line can later
/// be evicted on top of the cleared memory.
#[cfg(target_arch = "arm")]
pub fn clean_and_invalidate() {
    // SAFETY: CP15 c7 maintenance operations only affect cache state; every
    // dirty line is written back before it is invalidated, so no data is
    // lost.
    unsafe {
        let mut way: u32 = 0;
        loop {
            let mut line: u32 = 0;
            while line < DCACHE_WAY_SIZE {
                let index = way | line;
                core::arch::asm!("mcr p15, 0, {0}, c7, c14, 2", in(reg) index, options(nostack));
                line += LINE_SIZE;
            }
            way = way.wrapping_add(0x4000_0000);
            if way == 0 {
                break;
            }
        }
        core::arch::asm!(
            "mcr p15, 0, {0}, c7, c10, 4",
            "mcr p15, 0, {0}, c7, c5, 0",
            in(reg) 0u32,
            options(nostack)
        );
    }
}

/// Host builds have no caches to maintain.
#[cfg(not(target_arch = "arm"))]
pub fn clean_and_invalidate() {}
