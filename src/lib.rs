#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod boot;
pub mod config;
pub mod drivers;
pub mod logger;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;

use core::fmt::{self, Write};

pub use arch::arm::halt;

/// Print implementation that acquires the debug port writer lock
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // The port never reports failure.
    let _ = drivers::tty::WRITER.lock().write_fmt(args);
}

/// Print macro for debug port output
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::_print(format_args!($($arg)*)));
}

/// Println macro for debug port output
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

#[cfg(test)]
mod tests {
    #[test]
    fn print_macros_expand() {
        crate::print!("boot ");
        crate::println!("stage {}", 1);
        crate::println!();
    }
}
