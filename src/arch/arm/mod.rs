//! ARM946E-S support code
//!
//! Cache maintenance, the halt loop, and the trampoline that enters the
//! loaded guest.

pub mod cache;
pub mod trampoline;

/// Stop the core until an interrupt arrives.
///
/// With IME and IE cleared nothing can arrive, so callers that loop on this
/// never leave the loop.
#[cfg(target_arch = "arm")]
#[inline]
pub fn wait_for_interrupt() {
    // SAFETY: CP15 c7,c0,4 is the ARM946E-S wait-for-interrupt operation; it
    // touches no memory and only suspends the core.
    unsafe {
        core::arch::asm!("mcr p15, 0, {0}, c7, c0, 4", in(reg) 0u32, options(nomem, nostack));
    }
}

#[cfg(not(target_arch = "arm"))]
#[inline]
pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

/// Halt this core permanently.
pub fn halt() -> ! {
    loop {
        wait_for_interrupt();
    }
}
